//! Linear interpolation implementation.
//!
//! Bilinear for 2D, trilinear for 3D: the `2^D` corner voxels around each index are
//! gathered and blended with separable weights.

use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor};
use serde::{Deserialize, Serialize};

use super::trait_::{index_columns, strides, Interpolator};
use crate::error::Result;

/// Linear Interpolator.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LinearInterpolator;

impl LinearInterpolator {
    /// Create a new linear interpolator.
    pub fn new() -> Self {
        Self
    }
}

struct AxisSupport<B: Backend> {
    lower: Tensor<B, 1, Int>,
    upper: Tensor<B, 1, Int>,
    weight: Tensor<B, 1>,
    stride: i64,
}

impl<B: Backend> Interpolator<B> for LinearInterpolator {
    fn interpolate<const D: usize>(&self, data: &Tensor<B, D>, indices: Tensor<B, 2>) -> Result<Tensor<B, 1>> {
        let dims = data.dims();
        let strides = strides(dims);
        let batch_size = indices.dims()[0];
        let device = indices.device();

        let support: Vec<AxisSupport<B>> = index_columns::<B, D>(&indices)
            .into_iter()
            .enumerate()
            .map(|(k, coord)| {
                let axis = D - 1 - k;
                let max = (dims[axis] - 1) as f64;
                let c0 = coord.clone().floor();
                let weight = coord - c0.clone();
                let c1 = c0.clone() + 1.0;
                AxisSupport {
                    lower: c0.clamp(0.0, max).int(),
                    upper: c1.clamp(0.0, max).int(),
                    weight,
                    stride: strides[axis] as i64,
                }
            })
            .collect();

        let total: usize = dims.iter().product();
        let flat_data = data.clone().reshape([total]);
        let one = Tensor::<B, 1>::ones([batch_size], &device);

        let mut result = Tensor::<B, 1>::zeros([batch_size], &device);
        // Each bit of `corner` selects the upper neighbour along one axis.
        for corner in 0..(1usize << D) {
            let mut idx = Tensor::<B, 1, Int>::zeros([batch_size], &device);
            let mut weight = one.clone();
            for (k, axis) in support.iter().enumerate() {
                if corner & (1 << k) != 0 {
                    idx = idx + axis.upper.clone() * axis.stride;
                    weight = weight * axis.weight.clone();
                } else {
                    idx = idx + axis.lower.clone() * axis.stride;
                    weight = weight * (one.clone() - axis.weight.clone());
                }
            }
            result = result + flat_data.clone().gather(0, idx) * weight;
        }

        Ok(result)
    }
}
