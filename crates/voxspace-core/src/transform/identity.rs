//! Identity transform.
//!
//! A rigid transform with no rotation and no translation. Resampling through it is a
//! pure regridding of the input onto a new voxel lattice.

use super::trait_::Transform;
use crate::spatial::Point;

/// Identity transform of any dimensionality.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl IdentityTransform {
    /// Create a new identity transform.
    pub fn new() -> Self {
        Self
    }
}

impl<const D: usize> Transform<D> for IdentityTransform {
    fn transform_point(&self, point: &Point<D>) -> Point<D> {
        *point
    }
}
