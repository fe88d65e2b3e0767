//! Resample image filter.
//!
//! This module provides ResampleImageFilter which resamples an image
//! onto a new voxel lattice using a transform and an interpolator.

use std::marker::PhantomData;

use burn::tensor::backend::Backend;
use burn::tensor::{Bool, Shape, Tensor, TensorData};

use crate::error::Result;
use crate::image::Image;
use crate::interpolation::trait_::Interpolator;
use crate::spatial::{Direction, Point, Spacing, Vector};
use crate::transform::trait_::Transform;

/// Resample image filter.
///
/// For every voxel of the output lattice the filter computes its physical point,
/// maps it through the transform into the input's physical space, converts it to a
/// continuous input index and interpolates. Output voxels whose index falls outside
/// the input buffer receive the default pixel value.
///
/// Points and indices are computed in `f64`; only the final continuous indices are
/// handed to the interpolator as an `f32` tensor.
///
/// The transform maps Output Physical Space -> Input Physical Space.
///
/// # Type Parameters
/// * `B` - The Burn backend
/// * `T` - The transform type
/// * `I` - The interpolator type
/// * `D` - The dimensionality (2 or 3)
pub struct ResampleImageFilter<B, T, I, const D: usize>
where
    B: Backend,
    T: Transform<D>,
    I: Interpolator<B>,
{
    size: [usize; D],
    origin: Point<D>,
    spacing: Spacing<D>,
    direction: Direction<D>,
    transform: T,
    interpolator: I,
    default_pixel_value: f64,
    _phantom: PhantomData<B>,
}

impl<B, T, I, const D: usize> ResampleImageFilter<B, T, I, D>
where
    B: Backend,
    T: Transform<D>,
    I: Interpolator<B>,
{
    /// Create a new resample filter.
    ///
    /// # Arguments
    /// * `size` - Output voxel counts in physical axis order `(x, y[, z])`
    /// * `origin` - Output image origin (physical)
    /// * `spacing` - Output image spacing (physical)
    /// * `direction` - Output image direction (matrix)
    /// * `transform` - Transform from output space to input space
    /// * `interpolator` - Interpolator for input image sampling
    pub fn new(
        size: [usize; D],
        origin: Point<D>,
        spacing: Spacing<D>,
        direction: Direction<D>,
        transform: T,
        interpolator: I,
    ) -> Self {
        Self {
            size,
            origin,
            spacing,
            direction,
            transform,
            interpolator,
            default_pixel_value: 0.0,
            _phantom: PhantomData,
        }
    }

    /// Set default pixel value for outside the field of view.
    pub fn with_default_pixel_value(mut self, value: f64) -> Self {
        self.default_pixel_value = value;
        self
    }

    /// Apply filter to an input image.
    ///
    /// The result carries the filter's lattice and no metadata.
    pub fn apply(&self, input: &Image<B, D>) -> Result<Image<B, D>> {
        let device = input.data().device();
        let mut shape = self.size;
        shape.reverse();
        let total: usize = shape.iter().product();

        let to_input_index = input.physical_to_index_matrix()?;
        let input_size = input.size();

        let mut indices = Vec::with_capacity(total * D);
        let mut outside = Vec::with_capacity(total);
        // Output index in physical axis order; x varies fastest, matching row-major [.., Y, X].
        let mut counter = [0usize; D];
        for _ in 0..total {
            let mut scaled = Vector::<D>::zeros();
            for k in 0..D {
                scaled[k] = counter[k] as f64 * self.spacing[k];
            }
            let output_point = self.origin + self.direction * scaled;
            let input_point = self.transform.transform_point(&output_point);
            let index = to_input_index * (input_point - *input.origin()).0;

            let mut beyond = false;
            for k in 0..D {
                // Valid support is [-0.5, n - 0.5] on every axis.
                beyond |= index[k] < -0.5 || index[k] > input_size[k] as f64 - 0.5;
                indices.push(index[k] as f32);
            }
            outside.push(beyond);

            for k in 0..D {
                counter[k] += 1;
                if counter[k] < self.size[k] {
                    break;
                }
                counter[k] = 0;
            }
        }

        let indices = Tensor::<B, 2>::from_data(TensorData::new(indices, Shape::new([total, D])), &device);
        let outside = Tensor::<B, 1, Bool>::from_data(TensorData::new(outside, Shape::new([total])), &device);

        let values = self
            .interpolator
            .interpolate(input.data(), indices)?
            .mask_fill(outside, self.default_pixel_value);

        Ok(Image::new(
            values.reshape(shape),
            self.origin,
            self.spacing,
            self.direction,
        ))
    }
}
