use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use nalgebra::DVector;

/// A named, fixed-size vector of real values.
///
/// Port vectors are the only currency between systems: state, input, and
/// output are all `PortVector`s. The size is fixed at construction and the
/// name identifies the port in error reports, so a wiring mistake points at
/// the vector that carried it.
#[derive(Clone, PartialEq)]
pub struct PortVector {
    name: Arc<str>,
    values: DVector<f64>,
}

impl PortVector {
    /// Creates a port vector from a name and its values.
    pub fn new(name: impl Into<Arc<str>>, values: DVector<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Creates a port vector from a name and a plain `Vec`.
    pub fn from_vec(name: impl Into<Arc<str>>, values: Vec<f64>) -> Self {
        Self::new(name, DVector::from_vec(values))
    }

    /// Creates a zero-filled port vector of the given length.
    pub fn zeros(name: impl Into<Arc<str>>, len: usize) -> Self {
        Self::new(name, DVector::zeros(len))
    }

    /// Returns the port name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of coordinates.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when the vector has no coordinates.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the coordinates.
    pub fn values(&self) -> &DVector<f64> {
        &self.values
    }

    /// Returns the coordinates mutably. The length cannot change.
    pub fn values_mut(&mut self) -> &mut DVector<f64> {
        &mut self.values
    }

    /// Consumes the vector and returns its coordinates.
    pub fn into_values(self) -> DVector<f64> {
        self.values
    }

    /// Returns an iterator over the coordinates.
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.values.iter()
    }

    /// Returns `true` when every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|x| x.is_finite())
    }

    /// Returns the same coordinates under a different port name.
    #[must_use]
    pub fn renamed(&self, name: impl Into<Arc<str>>) -> Self {
        Self::new(name, self.values.clone())
    }

    /// Returns a new vector with the same port name and the given values.
    #[must_use]
    pub fn with_values(&self, values: DVector<f64>) -> Self {
        Self::new(Arc::clone(&self.name), values)
    }
}

impl Index<usize> for PortVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.values[index]
    }
}

impl fmt::Debug for PortVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PortVector(`{}`, {:?})", self.name, self.values.as_slice())
    }
}
