use super::Sample;

/// Event emitted after each accepted step.
///
/// Step 0 carries the initial state before any integration; steps 1..N
/// follow each accepted integration step.
#[derive(Debug, Clone)]
pub struct Event {
    /// The step number.
    pub step: usize,

    /// The accepted sample.
    pub sample: Sample,
}
