//! The [`DynamicalSystem`] capability and its composition building blocks.
//!
//! A dynamical system maps `(time, state, input)` to a state derivative and
//! an output, and declares the sizes of its state, input, and output ports.
//! Systems compose into larger systems ([`Cascade`], [`PdController`]) whose
//! port contracts are validated once at construction; evaluation then runs
//! in a fixed upstream-to-downstream order with no per-step scheduling.

mod affine;
mod cascade;
mod gain;
mod pd;
mod source;

pub use affine::AffineAdapter;
pub use cascade::{Cascade, connect};
pub use gain::Gain;
pub use pd::{PdController, PdGains, StateSelection};
pub use source::TrajectorySource;

use std::rc::Rc;
use std::sync::Arc;

use crate::{DomainError, EvalError, PortVector};

/// A continuous-time dynamical system.
///
/// Every system declares a port size triple — state, input, output — fixed
/// at construction. [`output`] and [`derivative`] are pure functions of
/// their arguments; configuration is immutable once the system participates
/// in a composition, which is what makes shared (reference-counted)
/// sub-systems safe without locking.
///
/// [`output`]: DynamicalSystem::output
/// [`derivative`]: DynamicalSystem::derivative
pub trait DynamicalSystem {
    /// Number of continuous state coordinates.
    fn num_states(&self) -> usize;

    /// Number of input coordinates.
    fn num_inputs(&self) -> usize;

    /// Number of output coordinates.
    fn num_outputs(&self) -> usize;

    /// The state the system starts from, of [`num_states`] length.
    ///
    /// Defaults to the zero vector.
    ///
    /// [`num_states`]: DynamicalSystem::num_states
    fn initial_state(&self) -> PortVector {
        PortVector::zeros("state", self.num_states())
    }

    /// Computes the output at the given time, state, and input.
    ///
    /// # Errors
    ///
    /// Returns an [`EvalError`] when the state or input size breaks the
    /// declared contract, or when the underlying dynamics cannot be
    /// evaluated.
    fn output(
        &self,
        time: f64,
        state: &PortVector,
        input: &PortVector,
    ) -> Result<PortVector, EvalError>;

    /// Computes the state derivative at the given time, state, and input.
    ///
    /// The result has the same size as the state.
    ///
    /// # Errors
    ///
    /// Returns an [`EvalError`] when the state or input size breaks the
    /// declared contract, or when the underlying dynamics cannot be
    /// evaluated.
    fn derivative(
        &self,
        time: f64,
        state: &PortVector,
        input: &PortVector,
    ) -> Result<PortVector, EvalError>;

    /// Checks the given state and input against the declared port sizes.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] naming the offending port on mismatch.
    fn check_sizes(&self, state: &PortVector, input: &PortVector) -> Result<(), DomainError> {
        if state.len() != self.num_states() {
            return Err(DomainError::StateSize {
                port: state.name().to_owned(),
                expected: self.num_states(),
                actual: state.len(),
            });
        }
        if input.len() != self.num_inputs() {
            return Err(DomainError::InputSize {
                port: input.name().to_owned(),
                expected: self.num_inputs(),
                actual: input.len(),
            });
        }
        Ok(())
    }
}

macro_rules! forward_dynamical_system {
    ($generic:ident, $wrapper:ty) => {
        impl<$generic: DynamicalSystem + ?Sized> DynamicalSystem for $wrapper {
            fn num_states(&self) -> usize {
                (**self).num_states()
            }

            fn num_inputs(&self) -> usize {
                (**self).num_inputs()
            }

            fn num_outputs(&self) -> usize {
                (**self).num_outputs()
            }

            fn initial_state(&self) -> PortVector {
                (**self).initial_state()
            }

            fn output(
                &self,
                time: f64,
                state: &PortVector,
                input: &PortVector,
            ) -> Result<PortVector, EvalError> {
                (**self).output(time, state, input)
            }

            fn derivative(
                &self,
                time: f64,
                state: &PortVector,
                input: &PortVector,
            ) -> Result<PortVector, EvalError> {
                (**self).derivative(time, state, input)
            }
        }
    };
}

forward_dynamical_system!(S, &S);
forward_dynamical_system!(S, Box<S>);
forward_dynamical_system!(S, Rc<S>);
forward_dynamical_system!(S, Arc<S>);
