use serde::{Deserialize, Serialize};

use camber_core::ConfigurationError;

/// The explicit integration scheme a [`Simulator`](super::Simulator) uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrationScheme {
    /// First-order forward Euler, fixed step.
    #[default]
    ForwardEuler,
    /// Classic fourth-order Runge-Kutta, fixed step.
    RungeKutta4,
    /// Embedded Euler/Heun pair with step control driven by
    /// `integration_tolerance`. The accepted step never exceeds
    /// `step_size`.
    HeunEuler,
}

/// Configuration for one simulation run.
///
/// Options are validated when the [`Simulator`](super::Simulator) is built
/// and immutable once a run starts. `step_size` is an upper bound on every
/// integration step, never a target to exceed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationOptions {
    /// Largest allowed integration step.
    pub step_size: f64,
    /// Simulation time at which the run completes.
    pub stop_time: f64,
    /// Local error target for adaptive schemes; fixed-step schemes ignore
    /// it.
    pub integration_tolerance: f64,
    /// The integration scheme.
    pub scheme: IntegrationScheme,
}

impl Default for SimulationOptions {
    /// An initial step of 5e-3 time units and no stop time.
    fn default() -> Self {
        Self {
            step_size: 5e-3,
            stop_time: f64::INFINITY,
            integration_tolerance: 1e-6,
            scheme: IntegrationScheme::default(),
        }
    }
}

impl SimulationOptions {
    /// Sets the largest allowed integration step.
    #[must_use]
    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    /// Sets the stop time.
    #[must_use]
    pub fn with_stop_time(mut self, stop_time: f64) -> Self {
        self.stop_time = stop_time;
        self
    }

    /// Sets the local error target for adaptive schemes.
    #[must_use]
    pub fn with_integration_tolerance(mut self, tolerance: f64) -> Self {
        self.integration_tolerance = tolerance;
        self
    }

    /// Sets the integration scheme.
    #[must_use]
    pub fn with_scheme(mut self, scheme: IntegrationScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.step_size.is_finite() && self.step_size > 0.0) {
            return Err(ConfigurationError::InvalidOption {
                option: "step_size",
                message: format!("{} is not a positive finite value", self.step_size),
            });
        }
        if self.stop_time.is_nan() || self.stop_time < 0.0 {
            return Err(ConfigurationError::InvalidOption {
                option: "stop_time",
                message: format!("{} is not a non-negative time", self.stop_time),
            });
        }
        if !(self.integration_tolerance.is_finite() && self.integration_tolerance > 0.0) {
            return Err(ConfigurationError::InvalidOption {
                option: "integration_tolerance",
                message: format!("{} is not a positive finite value", self.integration_tolerance),
            });
        }
        Ok(())
    }
}
