use std::sync::Arc;

use nalgebra::{DMatrix, DVector};

use crate::{ConfigurationError, EvalError, PortVector};

use super::DynamicalSystem;

/// A stateless affine map `y = D·u + y0`.
///
/// Used as an adapter between vector layouts, for example mapping a
/// planar vehicle state onto the pose of a floating joint so a
/// visualization stage can consume it.
#[derive(Debug, Clone)]
pub struct AffineAdapter {
    name: Arc<str>,
    matrix: DMatrix<f64>,
    offset: DVector<f64>,
}

impl AffineAdapter {
    /// Creates an affine adapter from its map and offset.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when the offset length does not
    /// match the number of matrix rows.
    pub fn new(matrix: DMatrix<f64>, offset: DVector<f64>) -> Result<Self, ConfigurationError> {
        if matrix.nrows() != offset.len() {
            return Err(ConfigurationError::AffineOffsetMismatch {
                rows: matrix.nrows(),
                offset: offset.len(),
            });
        }
        Ok(Self {
            name: Arc::from("affine"),
            matrix,
            offset,
        })
    }

    /// Renames the output port.
    #[must_use]
    pub fn named(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = name.into();
        self
    }
}

impl DynamicalSystem for AffineAdapter {
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
            &self.matrix * input.values() + &self.offset,
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
