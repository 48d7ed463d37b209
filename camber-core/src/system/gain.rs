use std::sync::Arc;

use nalgebra::{DMatrix, DVector};

use crate::{ConfigurationError, EvalError, PortVector};

use super::DynamicalSystem;

/// A stateless linear map `y = K·u`.
///
/// The matrix fixes both port sizes: the input port is as wide as the
/// matrix, the output port as tall. A typical use is mapping an external
/// command vector onto a controller's reference port.
#[derive(Debug, Clone)]
pub struct Gain {
    name: Arc<str>,
    matrix: DMatrix<f64>,
}

impl Gain {
    /// Creates a gain from its matrix.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EmptyGain`] when the matrix has no rows
    /// or no columns.
    pub fn new(matrix: DMatrix<f64>) -> Result<Self, ConfigurationError> {
        if matrix.nrows() == 0 || matrix.ncols() == 0 {
            return Err(ConfigurationError::EmptyGain);
        }
        Ok(Self {
            name: Arc::from("gain"),
            matrix,
        })
    }

    /// Creates a square gain scaling every coordinate by `k`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EmptyGain`] when `len` is zero.
    pub fn scalar(k: f64, len: usize) -> Result<Self, ConfigurationError> {
        Self::new(DMatrix::identity(len, len) * k)
    }

    /// Renames the output port.
    #[must_use]
    pub fn named(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the gain matrix.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }
}

impl DynamicalSystem for Gain {
    fn num_states(&self) -> usize {
        0
    }

    fn num_inputs(&self) -> usize {
        self.matrix.ncols()
    }

    fn num_outputs(&self) -> usize {
        self.matrix.nrows()
    }

    fn output(
        &self,
        _time: f64,
        state: &PortVector,
        input: &PortVector,
    ) -> Result<PortVector, EvalError> {
        self.check_sizes(state, input)?;
        Ok(PortVector::new(
            Arc::clone(&self.name),
            &self.matrix * input.values(),
        ))
    }

    fn derivative(
        &self,
        _time: f64,
        state: &PortVector,
        input: &PortVector,
    ) -> Result<PortVector, EvalError> {
        self.check_sizes(state, input)?;
        Ok(state.with_values(DVector::zeros(0)))
    }
}
