//! Core traits and types for the Camber framework.
//!
//! This crate defines the shared abstractions the solver and plant crates
//! build on:
//!
//! - [`PortVector`] — a named, fixed-size real vector exchanged between
//!   systems
//! - [`DynamicalSystem`] — a continuous-time system mapping
//!   `(time, state, input)` to a state derivative and an output
//! - [`Cascade`], [`Gain`], [`AffineAdapter`], [`TrajectorySource`],
//!   [`PdController`] — composition building blocks
//! - [`ConfigurationError`], [`DomainError`], [`EvalError`] — the error
//!   taxonomy shared across the workspace
//! - [`Observer`] — receives solver events and optionally returns control
//!   actions

mod error;
mod observer;
mod port;
pub mod system;

pub use error::{ConfigurationError, DomainError, EvalError};
pub use observer::Observer;
pub use port::PortVector;
pub use system::{
    AffineAdapter, Cascade, DynamicalSystem, Gain, PdController, PdGains, StateSelection,
    TrajectorySource, connect,
};
