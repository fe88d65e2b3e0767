//! Options controlling a single resampling call.

use serde::{Deserialize, Serialize};

use crate::interpolation::InterpolationOrder;

/// Configuration for [`resample`](super::resample).
///
/// The presets mirror the four common cases (2D/3D × intensity/label); every field
/// can be adjusted with the `with_*` builders.
///
/// ```rust
/// use voxspace_core::interpolation::InterpolationOrder;
/// use voxspace_core::resampler::ResampleOptions;
///
/// let options = ResampleOptions::label_3d().with_order(InterpolationOrder::NearestNeighbor);
/// assert!(options.is_label);
/// assert!(options.to_one_hot);
/// assert!(!options.copy_metadata);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResampleOptions {
    /// Order used for the full regrid, or for the in-plane pass when planes are split.
    pub order: InterpolationOrder,
    /// Treat the image as a label map (integer classes).
    pub is_label: bool,
    /// Expand multi-class label maps to one-hot channels before interpolation.
    pub to_one_hot: bool,
    /// For 3D images, regrid x/y and z in two passes with different orders.
    pub in_out_planes_separately: bool,
    /// Order used for the through-plane pass.
    pub out_plane_order: InterpolationOrder,
    /// Copy the source metadata dictionary onto the result.
    pub copy_metadata: bool,
}

impl Default for ResampleOptions {
    fn default() -> Self {
        Self::image_3d()
    }
}

impl ResampleOptions {
    /// 2D intensity image: BSpline, no metadata copy.
    pub fn image_2d() -> Self {
        Self {
            order: InterpolationOrder::BSpline,
            is_label: false,
            to_one_hot: false,
            in_out_planes_separately: false,
            out_plane_order: InterpolationOrder::NearestNeighbor,
            copy_metadata: false,
        }
    }

    /// 2D label map: Linear on one-hot channels, no metadata copy.
    pub fn label_2d() -> Self {
        Self {
            order: InterpolationOrder::Linear,
            is_label: true,
            to_one_hot: true,
            ..Self::image_2d()
        }
    }

    /// 3D intensity volume: BSpline in-plane, NearestNeighbor through-plane,
    /// metadata copied.
    pub fn image_3d() -> Self {
        Self {
            order: InterpolationOrder::BSpline,
            is_label: false,
            to_one_hot: false,
            in_out_planes_separately: true,
            out_plane_order: InterpolationOrder::NearestNeighbor,
            copy_metadata: true,
        }
    }

    /// 3D label volume: Linear in-plane on one-hot channels, NearestNeighbor
    /// through-plane, no metadata copy.
    pub fn label_3d() -> Self {
        Self {
            order: InterpolationOrder::Linear,
            is_label: true,
            to_one_hot: true,
            copy_metadata: false,
            ..Self::image_3d()
        }
    }

    /// Set the (in-plane) interpolation order.
    pub fn with_order(mut self, order: InterpolationOrder) -> Self {
        self.order = order;
        self
    }

    /// Set the through-plane interpolation order.
    pub fn with_out_plane_order(mut self, order: InterpolationOrder) -> Self {
        self.out_plane_order = order;
        self
    }

    /// Enable/disable two-pass in-plane/through-plane resampling.
    pub fn with_planes_separately(mut self, enabled: bool) -> Self {
        self.in_out_planes_separately = enabled;
        self
    }

    /// Mark the image as a label map.
    pub fn with_label(mut self, is_label: bool) -> Self {
        self.is_label = is_label;
        self
    }

    /// Enable/disable one-hot expansion of label maps.
    pub fn with_one_hot(mut self, enabled: bool) -> Self {
        self.to_one_hot = enabled;
        self
    }

    /// Enable/disable copying of the source metadata.
    pub fn with_copy_metadata(mut self, enabled: bool) -> Self {
        self.copy_metadata = enabled;
        self
    }

    /// Whether a 3D call would take the two-pass route.
    pub fn splits_planes(&self) -> bool {
        self.in_out_planes_separately && self.order != self.out_plane_order
    }
}
