//! Interpolator trait for sampling values at continuous coordinates.
//!
//! This module defines the core Interpolator trait that all interpolation methods must implement.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::error::Result;

/// Interpolator trait for sampling values at continuous coordinates.
///
/// # Type Parameters
/// * `B` - The Burn backend
pub trait Interpolator<B: Backend> {
    /// Interpolate values from a tensor at given continuous indices.
    ///
    /// # Arguments
    /// * `data` - The source tensor (`[D, H, W]` volume or `[H, W]` image)
    /// * `indices` - The indices at which to interpolate, `[Batch, D]`, each row in
    ///   physical axis order `(x, y[, z])`
    ///
    /// # Returns
    /// Tensor of sampled values `[Batch]`
    fn interpolate<const D: usize>(&self, data: &Tensor<B, D>, indices: Tensor<B, 2>) -> Result<Tensor<B, 1>>;
}

/// Split `[Batch, D]` indices into one `[Batch]` column per physical axis.
pub(crate) fn index_columns<B: Backend, const D: usize>(indices: &Tensor<B, 2>) -> Vec<Tensor<B, 1>> {
    (0..D)
        .map(|k| indices.clone().narrow(1, k, 1).squeeze::<1>(1))
        .collect()
}

/// Row-major strides of a tensor shape.
pub(crate) fn strides<const D: usize>(dims: [usize; D]) -> [usize; D] {
    let mut strides = [1usize; D];
    for axis in (0..D.saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * dims[axis + 1];
    }
    strides
}
