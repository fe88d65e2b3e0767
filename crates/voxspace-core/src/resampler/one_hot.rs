//! One-hot expansion of label maps and first-occurrence argmax reduction.

use burn::tensor::backend::Backend;
use burn::tensor::ElementConversion;

use crate::error::{Result, VoxspaceError};
use crate::image::Image;

/// Number of one-hot channels a label image expands to.
///
/// Returns `None` when the largest class is 0 or 1: such maps are resampled directly.
/// Fails with [`VoxspaceError::InvalidArgument`] when the image holds negative or
/// non-finite labels.
pub fn one_hot_channel_count<B: Backend, const D: usize>(image: &Image<B, D>) -> Result<Option<usize>> {
    let min_val = image.data().clone().min().into_scalar().elem::<f32>();
    let max_val = image.data().clone().max().into_scalar().elem::<f32>();

    if !min_val.is_finite() || !max_val.is_finite() {
        return Err(VoxspaceError::invalid_argument(format!(
            "label image contains non-finite values (min {min_val}, max {max_val})"
        )));
    }
    if min_val < 0.0 {
        return Err(VoxspaceError::invalid_argument(format!(
            "label image contains negative class {min_val}"
        )));
    }

    let max_class = max_val.round() as usize;
    Ok((max_class > 1).then_some(max_class + 1))
}

/// Split a label image into `channels` indicator images sharing its geometry.
///
/// Channel `c` is 1 where the voxel equals `c` and 0 elsewhere.
pub(crate) fn expand<B: Backend, const D: usize>(image: &Image<B, D>, channels: usize) -> Vec<Image<B, D>> {
    let labels = image.data().clone().round();
    (0..channels)
        .map(|class| image.with_data(labels.clone().equal_elem(class as f32).float()))
        .collect()
}

/// Collapse resampled channels back into class indices.
///
/// Ties resolve to the lowest class, as a channel only wins on a strictly greater value.
pub(crate) fn argmax<B: Backend, const D: usize>(channels: Vec<Image<B, D>>) -> Result<Image<B, D>> {
    let mut channels = channels.into_iter();
    let first = channels
        .next()
        .ok_or_else(|| VoxspaceError::invalid_argument("argmax over zero channels"))?;

    let mut best = first.data().clone();
    let mut classes = best.zeros_like();
    for (offset, channel) in channels.enumerate() {
        let values = channel.into_data();
        let wins = values.clone().greater(best.clone());
        best = best.mask_where(wins.clone(), values);
        classes = classes.mask_fill(wins, (offset + 1) as f32);
    }

    Ok(first.with_data(classes))
}
