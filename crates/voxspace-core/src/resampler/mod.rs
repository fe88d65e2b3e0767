//! Spacing-aware resampling of images and label maps.
//!
//! [`resample`] regrids an image onto a new voxel spacing while keeping its origin and
//! direction. Label maps with more than two classes are expanded to one indicator channel
//! per class, each channel is resampled independently and the result is collapsed back
//! with an argmax. 3D volumes can be regridded in two passes so that the through-plane
//! axis uses a different interpolation order than the in-plane axes.

pub mod one_hot;
pub mod options;

pub use one_hot::one_hot_channel_count;
pub use options::ResampleOptions;

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use tracing::debug;

use crate::error::{Result, VoxspaceError};
use crate::filter::ResampleImageFilter;
use crate::image::Image;
use crate::interpolation::InterpolationOrder;
use crate::spatial::Spacing;
use crate::transform::IdentityTransform;

const LABEL_TOLERANCE: f64 = 1e-4;

/// Voxel counts (physical axis order) of a grid covering the same extent at `new_spacing`.
///
/// `floor((old_size - 1) * old_spacing / new_spacing) + 1` per axis.
pub fn new_size<const D: usize>(old_size: [usize; D], old_spacing: &Spacing<D>, new_spacing: &Spacing<D>) -> [usize; D] {
    let mut size = [0usize; D];
    for i in 0..D {
        let extent = old_size[i].saturating_sub(1) as f64 * old_spacing[i];
        size[i] = (extent / new_spacing[i]).floor() as usize + 1;
    }
    size
}

/// Resample `image` to `new_spacing`.
///
/// The input is left untouched; the returned image has the input's origin and
/// direction, spacing `new_spacing` and size given by [`new_size`].
///
/// # Errors
/// * [`VoxspaceError::DimensionMismatch`] when `D` is not 2 or 3
/// * [`VoxspaceError::InvalidArgument`] for non-positive or non-finite spacings, or
///   negative labels on the one-hot path
///
/// # Examples
/// ```rust
/// use burn::tensor::Tensor;
/// use burn_ndarray::NdArray;
/// use voxspace_core::resampler::{resample, ResampleOptions};
/// use voxspace_core::spatial::{Direction3, Point3, Spacing3};
/// use voxspace_core::Image;
///
/// let device = Default::default();
/// let volume = Image::new(
///     Tensor::<NdArray<f32>, 3>::zeros([5, 16, 16], &device),
///     Point3::origin(),
///     Spacing3::new([0.5, 0.5, 4.0]),
///     Direction3::identity(),
/// );
///
/// let resampled = resample(&volume, Spacing3::new([1.0, 1.0, 2.0]), &ResampleOptions::image_3d()).unwrap();
/// assert_eq!(resampled.size(), [8, 8, 9]);
/// ```
pub fn resample<B: Backend, const D: usize>(
    image: &Image<B, D>,
    new_spacing: Spacing<D>,
    options: &ResampleOptions,
) -> Result<Image<B, D>> {
    if D != 2 && D != 3 {
        return Err(VoxspaceError::dimension_mismatch("2 or 3", D, "resample"));
    }
    image.spacing().validate()?;
    new_spacing.validate()?;

    let target_size = new_size(image.size(), image.spacing(), &new_spacing);
    debug!(
        from_size = ?image.size(),
        to_size = ?target_size,
        from_spacing = ?image.spacing().to_vec(),
        to_spacing = ?new_spacing.to_vec(),
        order = %options.order,
        is_label = options.is_label,
        "resampling image"
    );

    let channels = if options.is_label && options.to_one_hot {
        one_hot_channel_count(image)?
    } else {
        None
    };

    let mut result = match channels {
        Some(channels) => {
            debug!(channels, "resampling label map through one-hot channels");
            let resampled = one_hot::expand(image, channels)
                .iter()
                .map(|channel| resample_channel(channel, target_size, new_spacing, options))
                .collect::<Result<Vec<_>>>()?;
            one_hot::argmax(resampled)?
        }
        None => {
            let resampled = resample_channel(image, target_size, new_spacing, options)?;
            if options.is_label {
                let classes = truncate_labels(resampled.data().clone());
                resampled.with_data(classes)
            } else {
                resampled
            }
        }
    };

    if options.copy_metadata {
        result.copy_metadata_from(image);
    }
    Ok(result)
}

/// Integer class of each interpolated label value: clamped at 0, then truncated.
///
/// Interpolation of a constant neighbourhood may land a hair below the integer, so a
/// small tolerance is added before flooring.
fn truncate_labels<B: Backend, const D: usize>(values: Tensor<B, D>) -> Tensor<B, D> {
    (values.clamp_min(0.0) + LABEL_TOLERANCE).floor()
}

/// Regrid one channel, in two passes when the options split 3D planes.
fn resample_channel<B: Backend, const D: usize>(
    image: &Image<B, D>,
    size: [usize; D],
    spacing: Spacing<D>,
    options: &ResampleOptions,
) -> Result<Image<B, D>> {
    if D == 3 && options.splits_planes() {
        let mut in_plane_size = size;
        let mut in_plane_spacing = spacing;
        // z is the last physical axis
        let z = D - 1;
        in_plane_size[z] = image.size()[z];
        in_plane_spacing[z] = image.spacing()[z];

        let in_plane = regrid(image, in_plane_size, in_plane_spacing, options.order)?;
        regrid(&in_plane, size, spacing, options.out_plane_order)
    } else {
        regrid(image, size, spacing, options.order)
    }
}

fn regrid<B: Backend, const D: usize>(
    image: &Image<B, D>,
    size: [usize; D],
    spacing: Spacing<D>,
    order: InterpolationOrder,
) -> Result<Image<B, D>> {
    ResampleImageFilter::new(
        size,
        *image.origin(),
        spacing,
        *image.direction(),
        IdentityTransform::new(),
        order,
    )
    .apply(image)
}
