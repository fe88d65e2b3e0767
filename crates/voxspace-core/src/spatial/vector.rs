//! Vector type for representing spatial displacements and per-axis quantities.

use nalgebra::SVector;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoxspaceError};

/// A vector in D-dimensional space.
///
/// Used for spacing, offsets and scaled indices. Thin wrapper around nalgebra's
/// `SVector` so domain helpers can live next to the data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector<const D: usize>(pub SVector<f64, D>);

impl<const D: usize> Vector<D> {
    /// Create a new vector from components.
    pub fn new(components: [f64; D]) -> Self {
        Self(SVector::from(components))
    }

    /// Create a zero vector.
    pub fn zeros() -> Self {
        Self(SVector::zeros())
    }

    /// Create a vector from a runtime-length slice.
    ///
    /// Fails with [`VoxspaceError::DimensionMismatch`] if `components.len() != D`.
    pub fn try_from_slice(components: &[f64]) -> Result<Self> {
        if components.len() != D {
            return Err(VoxspaceError::dimension_mismatch(
                D.to_string(),
                components.len(),
                "vector from slice",
            ));
        }
        Ok(Self(SVector::from_column_slice(components)))
    }

    /// Convert vector to a vector of components.
    pub fn to_vec(&self) -> Vec<f64> {
        self.0.iter().copied().collect()
    }
}

impl<const D: usize> std::ops::Index<usize> for Vector<D> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<const D: usize> std::ops::IndexMut<usize> for Vector<D> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}
