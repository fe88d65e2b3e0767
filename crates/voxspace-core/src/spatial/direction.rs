//! Direction type for representing image orientation.

use nalgebra::SMatrix;
use serde::{Deserialize, Serialize};

use super::Vector;

/// Direction matrix representing image orientation.
///
/// Column i is the direction of the i-th image axis in physical space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Direction<const D: usize>(pub SMatrix<f64, D, D>);

impl<const D: usize> Direction<D> {
    /// Create an identity direction matrix (no rotation).
    pub fn identity() -> Self {
        Self(SMatrix::identity())
    }

    /// Try to compute the inverse of the direction matrix.
    pub fn try_inverse(&self) -> Option<Self> {
        self.0.try_inverse().map(Self)
    }

    /// Get the inner nalgebra matrix.
    pub fn inner(&self) -> &SMatrix<f64, D, D> {
        &self.0
    }
}

impl<const D: usize> std::ops::Mul<Vector<D>> for Direction<D> {
    type Output = Vector<D>;

    fn mul(self, vector: Vector<D>) -> Self::Output {
        Vector(self.0 * vector.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Direction3 = Direction<3>;

    #[test]
    fn test_direction_identity() {
        let d = Direction3::identity();
        assert_eq!(d.inner(), &SMatrix::<f64, 3, 3>::identity());
    }

    #[test]
    fn test_direction_times_vector() {
        // 90 degrees around Z
        let rot = Direction::<3>(SMatrix::<f64, 3, 3>::new(
            0.0, -1.0, 0.0,
            1.0, 0.0, 0.0,
            0.0, 0.0, 1.0,
        ));
        assert_eq!(rot * Vector::new([2.0, 0.0, 1.0]), Vector::new([0.0, 2.0, 1.0]));
    }

    #[test]
    fn test_direction_singular_has_no_inverse() {
        let singular = Direction::<2>(SMatrix::<f64, 2, 2>::zeros());
        assert!(singular.try_inverse().is_none());
        assert!(Direction::<2>::identity().try_inverse().is_some());
    }
}
