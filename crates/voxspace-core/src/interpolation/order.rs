//! Closed set of interpolation orders accepted by the resampler.

use std::fmt;
use std::str::FromStr;

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use serde::{Deserialize, Serialize};

use super::bspline::BSplineInterpolator;
use super::linear::LinearInterpolator;
use super::nearest::NearestNeighborInterpolator;
use super::trait_::Interpolator;
use crate::error::{Result, VoxspaceError};

/// Interpolation order used when regridding an image.
///
/// Parse from the conventional names with [`str::parse`]; any other name is rejected
/// with [`VoxspaceError::InvalidArgument`].
///
/// ```rust
/// use voxspace_core::interpolation::InterpolationOrder;
///
/// let order: InterpolationOrder = "BSpline".parse().unwrap();
/// assert_eq!(order, InterpolationOrder::BSpline);
/// assert!("Cubic".parse::<InterpolationOrder>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterpolationOrder {
    NearestNeighbor,
    Linear,
    BSpline,
}

impl InterpolationOrder {
    /// All accepted orders.
    pub const ALL: [InterpolationOrder; 3] = [
        InterpolationOrder::NearestNeighbor,
        InterpolationOrder::Linear,
        InterpolationOrder::BSpline,
    ];

    /// Canonical name of the order.
    pub fn name(&self) -> &'static str {
        match self {
            InterpolationOrder::NearestNeighbor => "NearestNeighbor",
            InterpolationOrder::Linear => "Linear",
            InterpolationOrder::BSpline => "BSpline",
        }
    }
}

impl fmt::Display for InterpolationOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InterpolationOrder {
    type Err = VoxspaceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|order| order.name() == s)
            .ok_or_else(|| {
                VoxspaceError::invalid_argument(format!(
                    "interpolation order '{}' is not one of (NearestNeighbor, Linear, BSpline)",
                    s
                ))
            })
    }
}

impl<B: Backend> Interpolator<B> for InterpolationOrder {
    fn interpolate<const D: usize>(&self, data: &Tensor<B, D>, indices: Tensor<B, 2>) -> Result<Tensor<B, 1>> {
        match self {
            InterpolationOrder::NearestNeighbor => NearestNeighborInterpolator::new().interpolate(data, indices),
            InterpolationOrder::Linear => LinearInterpolator::new().interpolate(data, indices),
            InterpolationOrder::BSpline => BSplineInterpolator::new().interpolate(data, indices),
        }
    }
}
