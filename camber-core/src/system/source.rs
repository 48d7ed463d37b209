use std::fmt;
use std::sync::Arc;

use nalgebra::DVector;

use crate::{ConfigurationError, EvalError, PortVector};

use super::DynamicalSystem;

/// A system with zero state and zero input whose output is a deterministic
/// function of time only.
///
/// Trajectory sources script actors that do not react to the rest of the
/// graph: a pre-programmed vehicle, a reference profile, a disturbance.
/// The waveform must be referentially transparent; it is sampled once at
/// construction to verify the declared output width.
#[derive(Clone)]
pub struct TrajectorySource {
    name: Arc<str>,
    output_len: usize,
    waveform: Arc<dyn Fn(f64) -> DVector<f64> + Send + Sync>,
}

impl TrajectorySource {
    /// Creates a source from its output width and waveform.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when the waveform's output width
    /// does not match `output_len`.
    pub fn new<F>(output_len: usize, waveform: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(f64) -> DVector<f64> + Send + Sync + 'static,
    {
        let probe = waveform(0.0);
        if probe.len() != output_len {
            return Err(ConfigurationError::WaveformSizeMismatch {
                declared: output_len,
                actual: probe.len(),
            });
        }
        Ok(Self {
            name: Arc::from("trajectory"),
            output_len,
            waveform: Arc::new(waveform),
        })
    }

    /// Renames the output port.
    #[must_use]
    pub fn named(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Samples the waveform at the given time.
    pub fn sample(&self, time: f64) -> PortVector {
        PortVector::new(Arc::clone(&self.name), (self.waveform)(time))
    }
}

impl fmt::Debug for TrajectorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrajectorySource")
            .field("name", &self.name)
            .field("output_len", &self.output_len)
            .finish_non_exhaustive()
    }
}

impl DynamicalSystem for TrajectorySource {
    fn num_states(&self) -> usize {
        0
    }

    fn num_inputs(&self) -> usize {
        0
    }

    fn num_outputs(&self) -> usize {
        self.output_len
    }

    fn output(
        &self,
        time: f64,
        state: &PortVector,
        input: &PortVector,
    ) -> Result<PortVector, EvalError> {
        self.check_sizes(state, input)?;
        Ok(self.sample(time))
    }

    fn derivative(
        &self,
        _time: f64,
        state: &PortVector,
        input: &PortVector,
    ) -> Result<PortVector, EvalError> {
        self.check_sizes(state, input)?;
        Ok(state.with_values(DVector::zeros(0)))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::dvector;

    use super::*;

    #[test]
    fn output_depends_on_time_only() {
        let source = TrajectorySource::new(2, |t| dvector![t, 2.0 * t]).unwrap();
        let state = PortVector::zeros("state", 0);
        let input = PortVector::zeros("input", 0);

        let early = source.output(1.0, &state, &input).unwrap();
        let late = source.output(3.0, &state, &input).unwrap();
        assert_relative_eq!(early[1], 2.0);
        assert_relative_eq!(late[0], 3.0);

        // Referentially transparent: the same time yields the same output.
        let again = source.output(1.0, &state, &input).unwrap();
        assert_eq!(again, early);
    }

    #[test]
    fn waveform_width_is_checked_at_construction() {
        let err = TrajectorySource::new(3, |_| dvector![1.0]).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::WaveformSizeMismatch {
                declared: 3,
                actual: 1,
            }
        ));
    }

    #[test]
    fn has_no_state_and_no_input() {
        let source = TrajectorySource::new(1, |_| dvector![0.0]).unwrap();
        assert_eq!(source.num_states(), 0);
        assert_eq!(source.num_inputs(), 0);
        assert!(source.initial_state().is_empty());
    }
}
