use nalgebra::DVector;

use crate::{ConfigurationError, EvalError, PortVector};

use super::DynamicalSystem;

/// Which plant state coordinates a [`PdController`] measures.
///
/// `positions[k]` and `velocities[k]` are the state indices observed for
/// actuated degree of freedom `k`.
#[derive(Debug, Clone)]
pub struct StateSelection {
    pub positions: Vec<usize>,
    pub velocities: Vec<usize>,
}

/// Proportional and derivative gains, one entry per actuated degree of
/// freedom. Fixed at construction; there is no online gain adaptation.
#[derive(Debug, Clone)]
pub struct PdGains {
    pub kp: DVector<f64>,
    pub kd: DVector<f64>,
}

impl PdGains {
    /// Creates gains with the same `kp` and `kd` for every entry.
    pub fn uniform(kp: f64, kd: f64, len: usize) -> Self {
        Self {
            kp: DVector::from_element(len, kp),
            kd: DVector::from_element(len, kd),
        }
    }
}

/// A proportional-derivative feedback wrapper around a plant.
///
/// The controller reads a reference input `[positions ++ velocities]`
/// (one pair per actuated degree of freedom), measures the selected plant
/// state coordinates, and forwards
///
/// ```text
/// command = kp ⊙ (ref_pos − meas_pos) + kd ⊙ (ref_vel − meas_vel)
/// ```
///
/// as the wrapped plant's actuator input. State and output ports are the
/// plant's own; only the input port changes, from actuator commands to
/// references.
#[derive(Debug, Clone)]
pub struct PdController<S> {
    plant: S,
    selection: StateSelection,
    gains: PdGains,
}

impl<S: DynamicalSystem> PdController<S> {
    /// Closes a PD loop around `plant`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when the gain vectors or the state
    /// selection do not have one entry per plant actuator, or when a
    /// selected index falls outside the plant state.
    pub fn connect(
        plant: S,
        selection: StateSelection,
        gains: PdGains,
    ) -> Result<Self, ConfigurationError> {
        let actuators = plant.num_inputs();
        if gains.kp.len() != actuators || gains.kd.len() != actuators {
            return Err(ConfigurationError::GainLengthMismatch {
                kp: gains.kp.len(),
                kd: gains.kd.len(),
                actuators,
            });
        }
        if selection.positions.len() != actuators || selection.velocities.len() != actuators {
            return Err(ConfigurationError::SelectionLengthMismatch {
                expected: actuators,
                positions: selection.positions.len(),
                velocities: selection.velocities.len(),
            });
        }
        let size = plant.num_states();
        for &index in selection.positions.iter().chain(&selection.velocities) {
            if index >= size {
                return Err(ConfigurationError::SelectorOutOfRange { index, size });
            }
        }
        Ok(Self {
            plant,
            selection,
            gains,
        })
    }

    /// Returns the wrapped plant.
    pub fn plant(&self) -> &S {
        &self.plant
    }

    /// Computes the actuator command for a reference and measurement.
    ///
    /// `reference` is `[positions ++ velocities]`, twice the actuator
    /// count; `measured_position` and `measured_velocity` hold one entry
    /// per actuator. Zero reference and zero measurement yield the zero
    /// command.
    pub fn compute_command(
        &self,
        reference: &DVector<f64>,
        measured_position: &DVector<f64>,
        measured_velocity: &DVector<f64>,
    ) -> DVector<f64> {
        let n = self.gains.kp.len();
        let ref_pos = reference.rows(0, n);
        let ref_vel = reference.rows(n, n);
        self.gains.kp.component_mul(&(ref_pos - measured_position))
            + self.gains.kd.component_mul(&(ref_vel - measured_velocity))
    }

    /// Measures the selected coordinates and computes the plant input.
    fn command_from(&self, state: &PortVector, reference: &PortVector) -> PortVector {
        let measured_position =
            DVector::from_iterator(
                self.selection.positions.len(),
                self.selection.positions.iter().map(|&i| state[i]),
            );
        let measured_velocity =
            DVector::from_iterator(
                self.selection.velocities.len(),
                self.selection.velocities.iter().map(|&i| state[i]),
            );
        PortVector::new(
            "actuator_command",
            self.compute_command(reference.values(), &measured_position, &measured_velocity),
        )
    }
}

impl<S: DynamicalSystem> DynamicalSystem for PdController<S> {
    fn num_states(&self) -> usize {
        self.plant.num_states()
    }

    fn num_inputs(&self) -> usize {
        2 * self.plant.num_inputs()
    }

    fn num_outputs(&self) -> usize {
        self.plant.num_outputs()
    }

    fn initial_state(&self) -> PortVector {
        self.plant.initial_state()
    }

    fn output(
        &self,
        time: f64,
        state: &PortVector,
        input: &PortVector,
    ) -> Result<PortVector, EvalError> {
        self.check_sizes(state, input)?;
        let command = self.command_from(state, input);
        self.plant.output(time, state, &command)
    }

    fn derivative(
        &self,
        time: f64,
        state: &PortVector,
        input: &PortVector,
    ) -> Result<PortVector, EvalError> {
        self.check_sizes(state, input)?;
        let command = self.command_from(state, input);
        self.plant.derivative(time, state, &command)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::dvector;

    use super::super::test_utils::PointMass;
    use super::*;

    fn point_mass_pd(kp: f64, kd: f64) -> PdController<PointMass> {
        PdController::connect(
            PointMass,
            StateSelection {
                positions: vec![0],
                velocities: vec![1],
            },
            PdGains::uniform(kp, kd, 1),
        )
        .unwrap()
    }

    #[test]
    fn zero_error_yields_zero_command() {
        let pd = point_mass_pd(10.0, 2.0);
        let command = pd.compute_command(&dvector![0.0, 0.0], &dvector![0.0], &dvector![0.0]);
        assert_eq!(command, dvector![0.0]);
    }

    #[test]
    fn command_is_elementwise_pd() {
        let pd = point_mass_pd(10.0, 2.0);
        let command = pd.compute_command(&dvector![1.0, 0.5], &dvector![0.25], &dvector![0.0]);
        assert_relative_eq!(command[0], 10.0 * 0.75 + 2.0 * 0.5);
    }

    #[test]
    fn closed_loop_accelerates_toward_the_reference() {
        let pd = point_mass_pd(10.0, 2.0);
        assert_eq!(pd.num_inputs(), 2);

        let state = PortVector::from_vec("state", vec![0.0, 0.0]);
        let reference = PortVector::from_vec("reference", vec![1.0, 0.0]);
        let dx = pd.derivative(0.0, &state, &reference).unwrap();

        assert_relative_eq!(dx[0], 0.0);
        assert_relative_eq!(dx[1], 10.0);
    }

    #[test]
    fn gain_lengths_are_validated() {
        let err = PdController::connect(
            PointMass,
            StateSelection {
                positions: vec![0],
                velocities: vec![1],
            },
            PdGains::uniform(1.0, 1.0, 2),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::GainLengthMismatch { .. }));
    }

    #[test]
    fn selection_indices_are_validated() {
        let err = PdController::connect(
            PointMass,
            StateSelection {
                positions: vec![0],
                velocities: vec![7],
            },
            PdGains::uniform(1.0, 1.0, 1),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::SelectorOutOfRange { index: 7, size: 2 }
        ));
    }
}
