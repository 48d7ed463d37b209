use nalgebra::{DVector, linalg::Cholesky};
use thiserror::Error;
use tracing::debug;

use camber_core::{ConfigurationError, DynamicalSystem, EvalError, PortVector};

use crate::contact::{ContactParameters, contact_forces};
use crate::dynamics::{bias_forces, mass_matrix};
use crate::kinematics::forward_kinematics;
use crate::tree::RigidBodyTree;

/// Failures of the equations-of-motion solve itself.
#[derive(Debug, Error)]
pub enum DynamicsError {
    #[error("mass matrix is not positive definite; a degree of freedom carries no inertia")]
    SingularMassMatrix,

    #[error("generalized position has {actual} coordinates, the tree has {expected}")]
    PositionSize { expected: usize, actual: usize },

    #[error("generalized velocity has {actual} coordinates, the tree has {expected}")]
    VelocitySize { expected: usize, actual: usize },

    #[error("actuator command has {actual} entries, the plant has {expected} actuators")]
    CommandSize { expected: usize, actual: usize },
}

/// One named actuator driving one joint coordinate.
#[derive(Debug, Clone)]
struct Actuator {
    name: String,
    dof: usize,
}

/// A rigid-body tree wrapped as a dynamical system.
///
/// The continuous state is `[q ++ v]`, the input is one force/torque
/// command per registered actuator, and the output is the full state.
/// Dynamics cover gravity, joint damping, actuator forces, and penalty
/// contact against flat terrain. The tree and the contact parameters are
/// fixed once simulation starts.
#[derive(Debug)]
pub struct RigidBodyPlant {
    tree: RigidBodyTree,
    contact: ContactParameters,
    actuators: Vec<Actuator>,
    initial_position: DVector<f64>,
}

impl RigidBodyPlant {
    /// Wraps a tree with default contact parameters, no actuators, and a
    /// zero initial configuration.
    pub fn new(tree: RigidBodyTree) -> Self {
        let positions = tree.num_positions();
        Self {
            tree,
            contact: ContactParameters::default(),
            actuators: Vec::new(),
            initial_position: DVector::zeros(positions),
        }
    }

    /// Replaces the contact parameters.
    #[must_use]
    pub fn with_contact_parameters(mut self, contact: ContactParameters) -> Self {
        self.contact = contact;
        self
    }

    /// Sets the configuration [`initial_state`] starts from.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when the vector length does not
    /// match the tree's position count.
    ///
    /// [`initial_state`]: DynamicalSystem::initial_state
    pub fn with_initial_position(
        mut self,
        position: DVector<f64>,
    ) -> Result<Self, ConfigurationError> {
        if position.len() != self.tree.num_positions() {
            return Err(ConfigurationError::PositionSize {
                expected: self.tree.num_positions(),
                actual: position.len(),
            });
        }
        self.initial_position = position;
        Ok(self)
    }

    /// Binds an actuator name to the joint it drives.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when the joint does not exist, has
    /// no degree of freedom, or the actuator name is already taken.
    pub fn add_actuator(
        &mut self,
        name: impl Into<String>,
        joint: &str,
    ) -> Result<(), ConfigurationError> {
        let name = name.into();
        if self.actuators.iter().any(|actuator| actuator.name == name) {
            return Err(ConfigurationError::DuplicateActuator(name));
        }
        let Some(body) = self.tree.find_joint(joint) else {
            return Err(ConfigurationError::UnresolvedActuator {
                actuator: name,
                joint: joint.to_owned(),
            });
        };
        let Some(dof) = self.tree.position_index(body) else {
            return Err(ConfigurationError::ActuatorWithoutDof {
                actuator: name,
                joint: joint.to_owned(),
            });
        };
        debug!(actuator = %name, joint, dof, "bound actuator");
        self.actuators.push(Actuator { name, dof });
        Ok(())
    }

    /// The wrapped tree.
    pub fn tree(&self) -> &RigidBodyTree {
        &self.tree
    }

    /// The active contact parameters.
    pub fn contact_parameters(&self) -> &ContactParameters {
        &self.contact
    }

    /// Registered actuator names, in registration order.
    pub fn actuator_names(&self) -> impl Iterator<Item = &str> {
        self.actuators.iter().map(|actuator| actuator.name.as_str())
    }

    /// The input-port slot of a named actuator.
    pub fn actuator_index(&self, name: &str) -> Option<usize> {
        self.actuators
            .iter()
            .position(|actuator| actuator.name == name)
    }

    /// The joint coordinate a named actuator drives.
    pub fn actuator_dof(&self, name: &str) -> Option<usize> {
        self.actuators
            .iter()
            .find(|actuator| actuator.name == name)
            .map(|actuator| actuator.dof)
    }

    /// Number of generalized position coordinates.
    pub fn num_positions(&self) -> usize {
        self.tree.num_positions()
    }

    /// Number of generalized velocity coordinates.
    pub fn num_velocities(&self) -> usize {
        self.tree.num_velocities()
    }

    /// Solves the equations of motion for the generalized acceleration.
    ///
    /// Actuator forces, gravity, damping, and any active contact forces
    /// are all included. Non-finite inputs propagate into the result
    /// rather than being clamped; the simulation driver treats them as
    /// terminal.
    ///
    /// # Errors
    ///
    /// Returns a [`DynamicsError`] on argument size mismatches or when the
    /// mass matrix cannot be factorized.
    pub fn forward_dynamics(
        &self,
        q: &DVector<f64>,
        v: &DVector<f64>,
        command: &DVector<f64>,
    ) -> Result<DVector<f64>, DynamicsError> {
        let positions = self.tree.num_positions();
        if q.len() != positions {
            return Err(DynamicsError::PositionSize {
                expected: positions,
                actual: q.len(),
            });
        }
        if v.len() != positions {
            return Err(DynamicsError::VelocitySize {
                expected: positions,
                actual: v.len(),
            });
        }
        if command.len() != self.actuators.len() {
            return Err(DynamicsError::CommandSize {
                expected: self.actuators.len(),
                actual: command.len(),
            });
        }
        if positions == 0 {
            return Ok(DVector::zeros(0));
        }

        let cache = forward_kinematics(&self.tree, q, v);
        let mass = mass_matrix(&self.tree, &cache);
        let bias = bias_forces(&self.tree, &cache, v);
        let contact = contact_forces(&self.tree, &cache, &self.contact);

        let mut rhs = contact - bias;
        for (actuator, effort) in self.actuators.iter().zip(command.iter()) {
            rhs[actuator.dof] += effort;
        }

        Cholesky::new(mass)
            .ok_or(DynamicsError::SingularMassMatrix)
            .map(|factor| factor.solve(&rhs))
    }
}

impl DynamicalSystem for RigidBodyPlant {
    fn num_states(&self) -> usize {
        self.tree.num_positions() + self.tree.num_velocities()
    }

    fn num_inputs(&self) -> usize {
        self.actuators.len()
    }

    fn num_outputs(&self) -> usize {
        self.num_states()
    }

    fn initial_state(&self) -> PortVector {
        let positions = self.tree.num_positions();
        let mut state = DVector::zeros(self.num_states());
        state.rows_mut(0, positions).copy_from(&self.initial_position);
        PortVector::new("plant_state", state)
    }

    fn output(
        &self,
        _time: f64,
        state: &PortVector,
        input: &PortVector,
    ) -> Result<PortVector, EvalError> {
        self.check_sizes(state, input)?;
        Ok(state.renamed("plant_output"))
    }

    fn derivative(
        &self,
        _time: f64,
        state: &PortVector,
        input: &PortVector,
    ) -> Result<PortVector, EvalError> {
        self.check_sizes(state, input)?;
        let positions = self.tree.num_positions();
        let q = state.values().rows(0, positions).into_owned();
        let v = state.values().rows(positions, positions).into_owned();

        let acceleration = self
            .forward_dynamics(&q, &v, input.values())
            .map_err(EvalError::dynamics)?;

        let mut derivative = DVector::zeros(self.num_states());
        derivative.rows_mut(0, positions).copy_from(&v);
        derivative
            .rows_mut(positions, positions)
            .copy_from(&acceleration);
        Ok(state.with_values(derivative))
    }
}
