//! Transient simulation of composed dynamical systems.

pub mod simulator;

pub use simulator::{
    Action, Event, IntegrationError, IntegrationFailure, IntegrationScheme, Phase, Sample,
    SimulationError, SimulationOptions, Simulator, Solution, Status,
};
