//! Transform trait for spatial coordinate transformations.

use crate::spatial::Point;

/// Transform trait for spatial coordinate transformations.
///
/// Maps points from one physical space to another. The resample filter uses it to
/// map output physical points into the input image's physical space. Points are
/// mapped in double precision.
///
/// # Type Parameters
/// * `D` - The spatial dimensionality (2 or 3)
pub trait Transform<const D: usize> {
    /// Apply the transform to a single point.
    fn transform_point(&self, point: &Point<D>) -> Point<D>;
}
