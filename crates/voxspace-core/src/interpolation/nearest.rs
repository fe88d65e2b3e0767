//! Nearest neighbor interpolation implementation.

use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor};

use super::trait_::{index_columns, strides, Interpolator};
use crate::error::Result;

/// Slack added before flooring so indices a hair below a `.5` tie still round up.
const TIE_TOLERANCE: f64 = 1e-5;

/// Nearest Neighbor Interpolator.
///
/// Rounds each continuous index to the nearest voxel, ties upward
/// (`floor(x + 0.5)`), clamped to the buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighborInterpolator;

impl NearestNeighborInterpolator {
    /// Create a new nearest neighbor interpolator.
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Interpolator<B> for NearestNeighborInterpolator {
    fn interpolate<const D: usize>(&self, data: &Tensor<B, D>, indices: Tensor<B, 2>) -> Result<Tensor<B, 1>> {
        let dims = data.dims();
        let strides = strides(dims);
        let columns = index_columns::<B, D>(&indices);

        let mut flat_index: Option<Tensor<B, 1, Int>> = None;
        for (k, coord) in columns.into_iter().enumerate() {
            // Physical axis k lives on tensor axis D-1-k.
            let axis = D - 1 - k;
            let term = (coord + (0.5 + TIE_TOLERANCE))
                .floor()
                .clamp(0.0, (dims[axis] - 1) as f64)
                .int()
                * (strides[axis] as i64);
            flat_index = Some(match flat_index {
                Some(acc) => acc + term,
                None => term,
            });
        }

        let total: usize = dims.iter().product();
        let flat_data = data.clone().reshape([total]);
        Ok(match flat_index {
            Some(idx) => flat_data.gather(0, idx),
            None => flat_data,
        })
    }
}
