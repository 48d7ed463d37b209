//! The transient simulation driver.
//!
//! A [`Simulator`] owns the run configuration and drives a borrowed
//! [`DynamicalSystem`] from an initial state toward the stop time:
//!
//! 1. Evaluate the derivative at the current time, state, and input.
//! 2. Advance `(t, x)` by one step no larger than the configured step
//!    size.
//! 3. Check the new state for non-finite values.
//! 4. Record a [`Sample`], emit an [`Event`], honor
//!    [`Action::StopEarly`].
//!
//! The working state buffer belongs exclusively to the simulator during a
//! run; the system itself is only borrowed and never mutated.

mod action;
mod error;
mod event;
mod options;
mod solution;

pub use action::Action;
pub use error::{IntegrationError, IntegrationFailure, SimulationError};
pub use event::Event;
pub use options::{IntegrationScheme, SimulationOptions};
pub use solution::{Sample, Solution, Status};

use tracing::{debug, warn};

use camber_core::{ConfigurationError, DynamicalSystem, Observer, PortVector};

/// Where a simulator is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unstarted,
    Running,
    Completed,
    Failed,
}

/// Drives one composed system through time.
pub struct Simulator {
    options: SimulationOptions,
    phase: Phase,
}

impl Simulator {
    /// Creates a simulator, validating the options.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] for a non-positive step size, a
    /// negative or NaN stop time, or a non-positive tolerance.
    pub fn new(options: SimulationOptions) -> Result<Self, ConfigurationError> {
        options.validate()?;
        Ok(Self {
            options,
            phase: Phase::Unstarted,
        })
    }

    /// The validated run configuration.
    pub fn options(&self) -> &SimulationOptions {
        &self.options
    }

    /// The current life-cycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Runs the system with a zero input vector.
    ///
    /// With the default infinite stop time the loop only ends through an
    /// observer; use [`run_observed`](Self::run_observed) in that case.
    ///
    /// # Errors
    ///
    /// See [`run_observed`](Self::run_observed).
    pub fn run<S>(
        &mut self,
        system: &S,
        initial_state: PortVector,
    ) -> Result<Solution, SimulationError>
    where
        S: DynamicalSystem,
    {
        let width = system.num_inputs();
        self.run_with_input(system, initial_state, move |_| {
            PortVector::zeros("input", width)
        })
    }

    /// Runs the system with a time-varying input.
    ///
    /// # Errors
    ///
    /// See [`run_observed`](Self::run_observed).
    pub fn run_with_input<S, F>(
        &mut self,
        system: &S,
        initial_state: PortVector,
        input: F,
    ) -> Result<Solution, SimulationError>
    where
        S: DynamicalSystem,
        F: FnMut(f64) -> PortVector,
    {
        self.run_observed(system, initial_state, input, ())
    }

    /// Runs the system, emitting an [`Event`] to `observer` after every
    /// accepted step. An observer answering [`Action::StopEarly`] ends the
    /// run with [`Status::StoppedByObserver`].
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Config`] before any stepping when the
    /// initial state does not match the system's state size, and
    /// [`SimulationError::Integration`] when the state turns non-finite or
    /// the dynamics cannot be evaluated; the error carries the last valid
    /// time and state.
    pub fn run_observed<S, F, Obs>(
        &mut self,
        system: &S,
        initial_state: PortVector,
        mut input: F,
        mut observer: Obs,
    ) -> Result<Solution, SimulationError>
    where
        S: DynamicalSystem,
        F: FnMut(f64) -> PortVector,
        Obs: Observer<Event, Action>,
    {
        if initial_state.len() != system.num_states() {
            return Err(ConfigurationError::InitialStateSize {
                port: initial_state.name().to_owned(),
                expected: system.num_states(),
                actual: initial_state.len(),
            }
            .into());
        }

        let options = self.options;
        self.phase = Phase::Running;
        debug!(
            step_size = options.step_size,
            stop_time = options.stop_time,
            scheme = ?options.scheme,
            "starting transient run"
        );

        let mut time = 0.0;
        let mut state = initial_state;
        let mut working_step = options.step_size;

        let output = match system.output(time, &state, &input(time)) {
            Ok(output) => output,
            Err(source) => {
                return Err(self.fail(time, &state, IntegrationFailure::Dynamics(source)));
            }
        };
        let mut samples = vec![Sample {
            time,
            state: state.clone(),
            output,
        }];
        let mut steps = 0usize;

        if let Some(Action::StopEarly) = observer.observe(&Event {
            step: 0,
            sample: samples[0].clone(),
        }) {
            self.phase = Phase::Completed;
            return Ok(Solution {
                status: Status::StoppedByObserver,
                samples,
                steps,
            });
        }

        while time < options.stop_time {
            let step = take_step(system, time, &state, &mut input, &mut working_step, &options);
            let (advanced, next_state) = match step {
                Ok(accepted) => accepted,
                Err(failure) => return Err(self.fail(time, &state, failure)),
            };
            if !next_state.is_finite() {
                return Err(self.fail(time, &state, IntegrationFailure::NonFiniteState));
            }

            time += advanced;
            state = next_state;

            let output = match system.output(time, &state, &input(time)) {
                Ok(output) => output,
                Err(source) => {
                    return Err(self.fail(time, &state, IntegrationFailure::Dynamics(source)));
                }
            };
            let sample = Sample {
                time,
                state: state.clone(),
                output,
            };
            samples.push(sample.clone());
            steps += 1;

            if let Some(Action::StopEarly) = observer.observe(&Event {
                step: steps,
                sample,
            }) {
                self.phase = Phase::Completed;
                return Ok(Solution {
                    status: Status::StoppedByObserver,
                    samples,
                    steps,
                });
            }
        }

        self.phase = Phase::Completed;
        debug!(steps, final_time = time, "transient run completed");
        Ok(Solution {
            status: Status::Completed,
            samples,
            steps,
        })
    }

    /// Marks the run failed and builds the terminal error.
    fn fail(
        &mut self,
        time: f64,
        state: &PortVector,
        failure: IntegrationFailure,
    ) -> SimulationError {
        self.phase = Phase::Failed;
        warn!(time, %failure, "transient run failed");
        IntegrationError {
            time,
            state: state.clone(),
            failure,
        }
        .into()
    }
}

/// Evaluates the derivative, rejecting non-finite results.
fn finite_derivative<S>(
    system: &S,
    time: f64,
    state: &PortVector,
    input: &PortVector,
) -> Result<PortVector, IntegrationFailure>
where
    S: DynamicalSystem,
{
    let derivative = system
        .derivative(time, state, input)
        .map_err(IntegrationFailure::Dynamics)?;
    if !derivative.is_finite() {
        return Err(IntegrationFailure::NonFiniteDerivative);
    }
    Ok(derivative)
}

/// `state + Σ weight · derivative` without touching the port name.
fn advance(state: &PortVector, terms: &[(f64, &PortVector)]) -> PortVector {
    let mut values = state.values().clone();
    for (weight, derivative) in terms {
        values += derivative.values() * *weight;
    }
    state.with_values(values)
}

/// Proposes one integration step of at most `options.step_size`.
///
/// Returns the time actually advanced and the new state. `working_step`
/// persists the adaptive scheme's step estimate between calls.
fn take_step<S, F>(
    system: &S,
    time: f64,
    state: &PortVector,
    input: &mut F,
    working_step: &mut f64,
    options: &SimulationOptions,
) -> Result<(f64, PortVector), IntegrationFailure>
where
    S: DynamicalSystem,
    F: FnMut(f64) -> PortVector,
{
    let full = options.step_size;
    match options.scheme {
        IntegrationScheme::ForwardEuler => {
            let k1 = finite_derivative(system, time, state, &input(time))?;
            Ok((full, advance(state, &[(full, &k1)])))
        }

        IntegrationScheme::RungeKutta4 => {
            let half = full / 2.0;
            let k1 = finite_derivative(system, time, state, &input(time))?;
            let k2 = finite_derivative(
                system,
                time + half,
                &advance(state, &[(half, &k1)]),
                &input(time + half),
            )?;
            let k3 = finite_derivative(
                system,
                time + half,
                &advance(state, &[(half, &k2)]),
                &input(time + half),
            )?;
            let k4 = finite_derivative(
                system,
                time + full,
                &advance(state, &[(full, &k3)]),
                &input(time + full),
            )?;
            Ok((
                full,
                advance(
                    state,
                    &[
                        (full / 6.0, &k1),
                        (full / 3.0, &k2),
                        (full / 3.0, &k3),
                        (full / 6.0, &k4),
                    ],
                ),
            ))
        }

        IntegrationScheme::HeunEuler => {
            let tolerance = options.integration_tolerance;
            let mut step = working_step.min(full);
            loop {
                let k1 = finite_derivative(system, time, state, &input(time))?;
                let euler = advance(state, &[(step, &k1)]);
                let k2 = finite_derivative(system, time + step, &euler, &input(time + step))?;

                // Euler vs. Heun disagreement estimates the local error.
                let error = if state.is_empty() {
                    0.0
                } else {
                    (k2.values() - k1.values()).amax() * step / 2.0
                };

                if error <= tolerance {
                    let heun = advance(state, &[(step / 2.0, &k1), (step / 2.0, &k2)]);
                    *working_step = if error < tolerance / 4.0 {
                        (step * 2.0).min(full)
                    } else {
                        step
                    };
                    return Ok((step, heun));
                }

                step /= 2.0;
                if step < full * 1e-12 {
                    return Err(IntegrationFailure::StepSizeCollapsed { step });
                }
            }
        }
    }
}
