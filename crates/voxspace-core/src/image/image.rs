//! Image type with physical metadata and coordinate transformations.
//!
//! This module provides the Image struct which represents medical images
//! with tensor data, physical space geometry (origin, spacing, direction) and a
//! free-form metadata dictionary.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use nalgebra::SMatrix;

use super::metadata::MetadataDictionary;
use crate::error::{Result, VoxspaceError};
use crate::spatial::{Direction, Point, Spacing, Vector};

/// Medical image with physical metadata.
///
/// The Image type combines tensor data with the geometry that maps voxel indices
/// to physical coordinates.
///
/// # Type Parameters
/// * `B` - The backend (CPU or GPU) for tensor operations
/// * `D` - The dimensionality of the image (2 or 3)
///
/// # Layout
/// Pixel data is stored `[Z, Y, X]` (3D) or `[Y, X]` (2D), while origin, spacing,
/// direction and [`Image::size`] use physical axis order `(x, y, z)`.
///
/// # Examples
/// ```rust
/// use voxspace_core::Image;
/// use voxspace_core::spatial::{Point3, Spacing3, Direction3};
/// use burn::tensor::Tensor;
/// use burn_ndarray::NdArray;
///
/// type Backend = NdArray<f32>;
///
/// let device = Default::default();
/// let data = Tensor::<Backend, 3>::zeros([4, 8, 10], &device);
/// let image = Image::new(
///     data,
///     Point3::new([0.0, 0.0, 0.0]),
///     Spacing3::new([0.8, 0.8, 3.0]),
///     Direction3::identity(),
/// );
/// assert_eq!(image.size(), [10, 8, 4]);
/// ```
#[derive(Debug, Clone)]
pub struct Image<B: Backend, const D: usize> {
    /// The pixel data, potentially on GPU.
    data: Tensor<B, D>,
    /// Physical coordinate of the first pixel (index 0,0,0).
    origin: Point<D>,
    /// Physical distance between pixels along each axis.
    spacing: Spacing<D>,
    /// Orientation of the image axes.
    direction: Direction<D>,
    /// Header-derived key/value pairs.
    metadata: MetadataDictionary,
}

impl<B: Backend, const D: usize> Image<B, D> {
    /// Create a new image with the given data and geometry and empty metadata.
    ///
    /// # Arguments
    /// * `data` - The image data as a tensor
    /// * `origin` - Physical coordinate of the first pixel
    /// * `spacing` - Physical distance between pixels along each axis
    /// * `direction` - Orientation matrix of the image axes
    pub fn new(
        data: Tensor<B, D>,
        origin: Point<D>,
        spacing: Spacing<D>,
        direction: Direction<D>,
    ) -> Self {
        Self {
            data,
            origin,
            spacing,
            direction,
            metadata: MetadataDictionary::new(),
        }
    }

    /// Replace the metadata dictionary.
    pub fn with_metadata(mut self, metadata: MetadataDictionary) -> Self {
        self.metadata = metadata;
        self
    }

    /// Create an image sharing this image's geometry but holding `data`.
    ///
    /// Metadata is not carried over.
    pub fn with_data(&self, data: Tensor<B, D>) -> Self {
        Self::new(data, self.origin, self.spacing, self.direction)
    }

    /// Get the image data tensor.
    pub fn data(&self) -> &Tensor<B, D> {
        &self.data
    }

    /// Consume the image, returning its data tensor.
    pub fn into_data(self) -> Tensor<B, D> {
        self.data
    }

    /// Get the origin (physical coordinate of first pixel).
    pub fn origin(&self) -> &Point<D> {
        &self.origin
    }

    /// Get the spacing (physical distance between pixels).
    pub fn spacing(&self) -> &Spacing<D> {
        &self.spacing
    }

    /// Get the direction (orientation matrix).
    pub fn direction(&self) -> &Direction<D> {
        &self.direction
    }

    /// Get the metadata dictionary.
    pub fn metadata(&self) -> &MetadataDictionary {
        &self.metadata
    }

    /// Get the metadata dictionary for modification.
    pub fn metadata_mut(&mut self) -> &mut MetadataDictionary {
        &mut self.metadata
    }

    /// Copy every metadata entry of `source` onto this image.
    pub fn copy_metadata_from(&mut self, source: &Image<B, D>) {
        self.metadata.extend_from(&source.metadata);
    }

    /// Get the tensor shape (`[Z, Y, X]` / `[Y, X]`).
    pub fn shape(&self) -> [usize; D] {
        self.data.dims()
    }

    /// Get the voxel count per physical axis (`[X, Y, Z]` / `[X, Y]`).
    pub fn size(&self) -> [usize; D] {
        let mut size = self.shape();
        size.reverse();
        size
    }

    /// Get all sample values as `f32`, in tensor (row-major) order.
    pub fn to_vec(&self) -> Result<Vec<f32>> {
        self.data
            .to_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| VoxspaceError::tensor(format!("{:?}", e)))
    }

    /// Matrix taking `point - origin` to a continuous index: `diag(1 / spacing) * Direction^-1`.
    ///
    /// Fails with [`VoxspaceError::InvalidGeometry`] if the direction is singular.
    pub fn physical_to_index_matrix(&self) -> Result<SMatrix<f64, D, D>> {
        let inverse = self.direction.try_inverse().ok_or_else(|| {
            VoxspaceError::invalid_geometry(format!(
                "direction matrix {:?} is not invertible",
                self.direction.inner()
            ))
        })?;

        let mut matrix = inverse.0;
        for (r, mut row) in matrix.row_iter_mut().enumerate() {
            row /= self.spacing[r];
        }
        Ok(matrix)
    }

    /// Convert a continuous physical point to a continuous index.
    ///
    /// `index = (Direction^-1 * (point - origin)) / spacing`
    ///
    /// Fails with [`VoxspaceError::InvalidGeometry`] if the direction is singular.
    pub fn transform_physical_point_to_continuous_index(&self, point: &Point<D>) -> Result<Point<D>> {
        let matrix = self.physical_to_index_matrix()?;
        Ok(Point((matrix * (*point - self.origin).0).into()))
    }

    /// Convert a continuous index to a physical point.
    ///
    /// `point = origin + Direction * (index * spacing)`
    pub fn transform_continuous_index_to_physical_point(&self, index: &Point<D>) -> Point<D> {
        let mut scaled_index = Vector::<D>::zeros();
        for i in 0..D {
            scaled_index[i] = index[i] * self.spacing[i];
        }
        self.origin + self.direction * scaled_index
    }
}
