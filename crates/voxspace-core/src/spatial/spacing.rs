//! Spacing type for representing physical distances between pixels/voxels.

use super::Vector;
use crate::error::{Result, VoxspaceError};

/// Spacing between adjacent pixels/voxels along each axis, in physical axis order.
///
/// Type alias to [`Vector`] for semantic clarity.
pub type Spacing<const D: usize> = Vector<D>;

impl<const D: usize> Spacing<D> {
    /// Create uniform spacing (same value for all dimensions).
    pub fn uniform(value: f64) -> Self {
        Self::new([value; D])
    }

    /// Ensure every component is finite and strictly positive.
    pub fn validate(&self) -> Result<()> {
        match self.0.iter().position(|s| !s.is_finite() || *s <= 0.0) {
            Some(axis) => Err(VoxspaceError::invalid_argument(format!(
                "spacing must be finite and strictly positive, got {} on axis {} of {:?}",
                self[axis],
                axis,
                self.to_vec()
            ))),
            None => Ok(()),
        }
    }
}
