use nalgebra::DVector;

use crate::{ConfigurationError, EvalError, PortVector};

use super::DynamicalSystem;

/// Two systems connected in series: the upstream output feeds the
/// downstream input.
///
/// A cascade's input port is the upstream input, its output port the
/// downstream output, and its state is the upstream state followed by the
/// downstream state. Evaluation is strictly upstream-to-downstream in a
/// single pass; there is no fixed-point iteration, so the composition is
/// acyclic by construction. Feedback loops belong in an explicit
/// controller component such as [`PdController`](super::PdController).
///
/// Longer chains are built by nesting cascades.
#[derive(Debug, Clone)]
pub struct Cascade<A, B> {
    upstream: A,
    downstream: B,
}

/// Connects two systems in series. Shorthand for [`Cascade::connect`].
///
/// # Errors
///
/// Returns a [`ConfigurationError`] when the upstream output size does not
/// match the downstream input size.
pub fn connect<A, B>(upstream: A, downstream: B) -> Result<Cascade<A, B>, ConfigurationError>
where
    A: DynamicalSystem,
    B: DynamicalSystem,
{
    Cascade::connect(upstream, downstream)
}

impl<A, B> Cascade<A, B>
where
    A: DynamicalSystem,
    B: DynamicalSystem,
{
    /// Connects `upstream` to `downstream`, validating the port contract.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::PortSizeMismatch`] when the upstream
    /// output size differs from the downstream input size. The mismatch is
    /// rejected here, before any integration work, and is never silently
    /// truncated.
    pub fn connect(upstream: A, downstream: B) -> Result<Self, ConfigurationError> {
        if upstream.num_outputs() != downstream.num_inputs() {
            return Err(ConfigurationError::PortSizeMismatch {
                emitted: upstream.num_outputs(),
                accepted: downstream.num_inputs(),
            });
        }
        Ok(Self {
            upstream,
            downstream,
        })
    }

    /// Returns the upstream system.
    pub fn upstream(&self) -> &A {
        &self.upstream
    }

    /// Returns the downstream system.
    pub fn downstream(&self) -> &B {
        &self.downstream
    }

    /// Splits a composed state into the upstream and downstream parts.
    fn split_state(&self, state: &PortVector) -> (PortVector, PortVector) {
        let na = self.upstream.num_states();
        let nb = self.downstream.num_states();
        (
            state.with_values(state.values().rows(0, na).into_owned()),
            state.with_values(state.values().rows(na, nb).into_owned()),
        )
    }

    /// Concatenates upstream and downstream vectors in connection order.
    fn join(name_source: &PortVector, a: &PortVector, b: &PortVector) -> PortVector {
        let joined = DVector::from_iterator(
            a.len() + b.len(),
            a.iter().chain(b.iter()).copied(),
        );
        name_source.with_values(joined)
    }
}

impl<A, B> DynamicalSystem for Cascade<A, B>
where
    A: DynamicalSystem,
    B: DynamicalSystem,
{
    fn num_states(&self) -> usize {
        self.upstream.num_states() + self.downstream.num_states()
    }

    fn num_inputs(&self) -> usize {
        self.upstream.num_inputs()
    }

    fn num_outputs(&self) -> usize {
        self.downstream.num_outputs()
    }

    fn initial_state(&self) -> PortVector {
        let a = self.upstream.initial_state();
        let b = self.downstream.initial_state();
        Self::join(&PortVector::zeros("cascade_state", 0), &a, &b)
    }

    fn output(
        &self,
        time: f64,
        state: &PortVector,
        input: &PortVector,
    ) -> Result<PortVector, EvalError> {
        self.check_sizes(state, input)?;
        let (xa, xb) = self.split_state(state);
        let inner = self.upstream.output(time, &xa, input)?;
        self.downstream.output(time, &xb, &inner)
    }

    fn derivative(
        &self,
        time: f64,
        state: &PortVector,
        input: &PortVector,
    ) -> Result<PortVector, EvalError> {
        self.check_sizes(state, input)?;
        let (xa, xb) = self.split_state(state);
        let inner = self.upstream.output(time, &xa, input)?;
        let da = self.upstream.derivative(time, &xa, input)?;
        let db = self.downstream.derivative(time, &xb, &inner)?;
        Ok(Self::join(state, &da, &db))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::super::test_utils::PointMass;
    use super::*;
    use crate::system::Gain;

    #[test]
    fn composed_ports_follow_the_ends() {
        let cascade = connect(Gain::scalar(2.0, 1).unwrap(), PointMass).unwrap();
        assert_eq!(cascade.num_inputs(), 1);
        assert_eq!(cascade.num_outputs(), 2);
        assert_eq!(cascade.num_states(), 2);
    }

    #[test]
    fn mismatched_ports_are_rejected() {
        let err = connect(Gain::scalar(1.0, 3).unwrap(), PointMass).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::PortSizeMismatch {
                emitted: 3,
                accepted: 1,
            }
        ));
    }

    #[test]
    fn upstream_output_feeds_downstream() {
        // Double the force before it reaches the point mass.
        let cascade = connect(Gain::scalar(2.0, 1).unwrap(), PointMass).unwrap();
        let state = PortVector::from_vec("state", vec![0.0, 1.0]);
        let input = PortVector::from_vec("force", vec![3.0]);

        let dx = cascade.derivative(0.0, &state, &input).unwrap();
        assert_relative_eq!(dx[0], 1.0);
        assert_relative_eq!(dx[1], 6.0);
    }

    #[test]
    fn state_concatenates_in_connection_order() {
        let inner = connect(Gain::scalar(1.0, 1).unwrap(), PointMass).unwrap();
        let nested = connect(Gain::scalar(1.0, 1).unwrap(), inner).unwrap();
        assert_eq!(nested.num_states(), 2);
        assert_eq!(nested.initial_state().len(), 2);
    }
}
