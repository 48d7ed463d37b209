//! Numerical drivers that advance composed systems through time.
//!
//! The only driver today is the transient [`Simulator`], which steps a
//! [`DynamicalSystem`](camber_core::DynamicalSystem) from an initial state
//! to a stop time with an explicit integration scheme.

pub mod transient;

pub use transient::{
    Action, Event, IntegrationError, IntegrationFailure, IntegrationScheme, Phase, Sample,
    SimulationError, SimulationOptions, Simulator, Solution, Status,
};
