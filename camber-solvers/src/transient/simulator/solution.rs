use camber_core::PortVector;

/// Indicates how a run terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Simulation time reached the configured stop time.
    Completed,

    /// An observer answered with [`Action::StopEarly`](super::Action).
    StoppedByObserver,
}

/// One accepted step: the time, the state, and the system output there.
#[derive(Debug, Clone)]
pub struct Sample {
    pub time: f64,
    pub state: PortVector,
    pub output: PortVector,
}

/// The result of a completed run.
#[derive(Debug, Clone)]
pub struct Solution {
    /// How the run terminated.
    pub status: Status,

    /// Every accepted step, the initial state included.
    pub samples: Vec<Sample>,

    /// Number of integration steps taken.
    pub steps: usize,
}

impl Solution {
    /// The final simulation time.
    #[allow(clippy::missing_panics_doc)]
    pub fn final_time(&self) -> f64 {
        self.samples
            .last()
            .expect("a solution holds at least the initial sample")
            .time
    }

    /// The final state.
    #[allow(clippy::missing_panics_doc)]
    pub fn final_state(&self) -> &PortVector {
        &self
            .samples
            .last()
            .expect("a solution holds at least the initial sample")
            .state
    }
}
