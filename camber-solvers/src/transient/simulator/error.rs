use thiserror::Error;

use camber_core::{ConfigurationError, EvalError, PortVector};

/// Errors a simulation run can return.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Rejected before any stepping: bad options or a mis-sized initial
    /// state.
    #[error(transparent)]
    Config(#[from] ConfigurationError),

    /// The run started and then failed; the payload carries the last
    /// valid time and state for diagnosis.
    #[error(transparent)]
    Integration(#[from] IntegrationError),
}

/// A terminal mid-run failure.
///
/// `time` and `state` are the last values known to be good; the step that
/// produced the failure was discarded. The failure ends this run only —
/// other simulator instances are unaffected.
#[derive(Debug, Error)]
#[error("integration failed at t = {time}: {failure}")]
pub struct IntegrationError {
    pub time: f64,
    pub state: PortVector,
    pub failure: IntegrationFailure,
}

/// What went wrong inside a step.
#[derive(Debug, Error)]
pub enum IntegrationFailure {
    #[error("state is no longer finite")]
    NonFiniteState,

    #[error("state derivative is no longer finite")]
    NonFiniteDerivative,

    #[error("dynamics evaluation failed")]
    Dynamics(#[source] EvalError),

    #[error("adaptive step collapsed to {step} without meeting the tolerance")]
    StepSizeCollapsed { step: f64 },
}
