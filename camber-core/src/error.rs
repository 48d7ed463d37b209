use std::error::Error as StdError;

use thiserror::Error;

/// Errors raised while building or composing systems.
///
/// Configuration errors are detected at construction time, before any
/// integration work starts. They are never raised mid-run.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error(
        "cannot connect systems: upstream emits {emitted} values, downstream accepts {accepted}"
    )]
    PortSizeMismatch { emitted: usize, accepted: usize },

    #[error("gain matrix must have at least one row and one column")]
    EmptyGain,

    #[error("affine offset has {offset} entries but the map produces {rows}")]
    AffineOffsetMismatch { rows: usize, offset: usize },

    #[error(
        "gain vectors need one entry per actuated degree of freedom: \
         kp has {kp}, kd has {kd}, the plant accepts {actuators}"
    )]
    GainLengthMismatch {
        kp: usize,
        kd: usize,
        actuators: usize,
    },

    #[error(
        "state selection needs {expected} position and {expected} velocity indices, \
         got {positions} and {velocities}"
    )]
    SelectionLengthMismatch {
        expected: usize,
        positions: usize,
        velocities: usize,
    },

    #[error("state index {index} is out of range for a state of size {size}")]
    SelectorOutOfRange { index: usize, size: usize },

    #[error("trajectory waveform produces {actual} values, declared {declared}")]
    WaveformSizeMismatch { declared: usize, actual: usize },

    #[error("unknown trajectory index {index}: the catalog holds {catalog_len} entries")]
    UnknownTrajectory { index: usize, catalog_len: usize },

    #[error("model name `{0}` is already registered")]
    DuplicateModelName(String),

    #[error("duplicate body name `{0}`")]
    DuplicateBodyName(String),

    #[error("duplicate joint name `{0}`")]
    DuplicateJointName(String),

    #[error("parent body index {index} does not exist in a tree of {bodies} bodies")]
    UnknownParentBody { index: usize, bodies: usize },

    #[error("actuator `{actuator}` references unknown joint `{joint}`")]
    UnresolvedActuator { actuator: String, joint: String },

    #[error("actuator `{actuator}` references fixed joint `{joint}`, which has no degree of freedom")]
    ActuatorWithoutDof { actuator: String, joint: String },

    #[error("actuator `{0}` is already registered")]
    DuplicateActuator(String),

    #[error("the plant has no actuator named `{0}`")]
    UnknownActuator(String),

    #[error("initial state `{port}` has {actual} values, the system declares {expected}")]
    InitialStateSize {
        port: String,
        expected: usize,
        actual: usize,
    },

    #[error("position vector has {actual} coordinates, the tree has {expected}")]
    PositionSize { expected: usize, actual: usize },

    #[error("invalid {option}: {message}")]
    InvalidOption {
        option: &'static str,
        message: String,
    },
}

/// A system evaluation received a vector of the wrong size.
///
/// This always indicates a composition bug, not a user-recoverable
/// condition: the sizes were declared at construction and the caller broke
/// the contract.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("state `{port}` has {actual} values, the system declares {expected}")]
    StateSize {
        port: String,
        expected: usize,
        actual: usize,
    },

    #[error("input `{port}` has {actual} values, the system declares {expected}")]
    InputSize {
        port: String,
        expected: usize,
        actual: usize,
    },
}

/// Errors raised while evaluating a system's output or derivative.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("dynamics evaluation failed")]
    Dynamics(#[source] Box<dyn StdError + Send + Sync>),
}

impl EvalError {
    /// Wraps a dynamics-level failure, such as a singular mass matrix.
    pub fn dynamics<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Dynamics(Box::new(err))
    }
}
