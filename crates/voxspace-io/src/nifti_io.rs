//! NIfTI-1 reading into [`Image`] values.
//!
//! Origin and direction come from the sform, the qform or (when neither is set) the
//! pixdim scaling, in that order of preference. Spacing is taken from `pixdim`.

use std::path::Path;

use burn::tensor::backend::Backend;
use burn::tensor::{Shape, Tensor, TensorData};
use nalgebra::SMatrix;
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};
use tracing::debug;
use voxspace_core::error::{Result, VoxspaceError};
use voxspace_core::image::{Image, MetadataDictionary};
use voxspace_core::spatial::{Direction, Point, Spacing};

/// Voxel counts and spacing of a NIfTI file, in physical axis order.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderGeometry {
    pub size: Vec<usize>,
    pub spacing: Vec<f64>,
}

impl HeaderGeometry {
    /// Number of spatial axes.
    pub fn dimension(&self) -> usize {
        self.size.len()
    }
}

/// Read size and spacing from the header of `path` without loading voxel data.
pub fn read_header_geometry<P: AsRef<Path>>(path: P) -> Result<HeaderGeometry> {
    let path = path.as_ref();
    ensure_exists(path)?;
    let header = NiftiHeader::from_file(path).map_err(|e| VoxspaceError::io(path, e.to_string()))?;
    header_geometry(&header, path)
}

/// Read a 2D or 3D NIfTI image.
///
/// Voxel data is converted to `f32` (applying `scl_slope`/`scl_inter`) and laid out
/// `[Z, Y, X]` / `[Y, X]`. Header fields are recorded in the image's metadata dictionary.
pub fn read_nifti<B: Backend, const D: usize, P: AsRef<Path>>(path: P, device: &B::Device) -> Result<Image<B, D>> {
    let path = path.as_ref();
    ensure_exists(path)?;
    let obj = ReaderOptions::new()
        .read_file(path)
        .map_err(|e| VoxspaceError::io(path, e.to_string()))?;
    let header = obj.header().clone();

    let geometry = header_geometry(&header, path)?;
    if geometry.dimension() != D {
        return Err(VoxspaceError::dimension_mismatch(
            D.to_string(),
            geometry.dimension(),
            path.display().to_string(),
        ));
    }

    let affine = affine(&header);
    let mut origin = Point::<D>::origin();
    let mut direction = SMatrix::<f64, D, D>::identity();
    for c in 0..D {
        origin[c] = affine[c][3];
        let column: Vec<f64> = (0..D).map(|r| affine[r][c]).collect();
        let norm = column.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 1e-9 {
            for (r, value) in column.iter().enumerate() {
                direction[(r, c)] = value / norm;
            }
        }
    }
    let spacing = Spacing::<D>::try_from_slice(&geometry.spacing)?;

    let volume = obj
        .into_volume()
        .into_ndarray::<f32>()
        .map_err(|e| VoxspaceError::io(path, e.to_string()))?;
    let voxels: usize = geometry.size.iter().product();
    if volume.len() != voxels {
        return Err(VoxspaceError::io(
            path,
            format!("expected {voxels} voxels for size {:?}, found {}", geometry.size, volume.len()),
        ));
    }

    // NIfTI arrays are indexed (x, y, z); reversing the axes yields row-major [Z, Y, X].
    let values: Vec<f32> = volume.reversed_axes().iter().copied().collect();
    let mut shape = [0usize; D];
    for (axis, extent) in shape.iter_mut().enumerate() {
        *extent = geometry.size[D - 1 - axis];
    }
    let tensor = Tensor::<B, D>::from_data(TensorData::new(values, Shape::new(shape)), device);

    debug!(path = %path.display(), size = ?geometry.size, spacing = ?geometry.spacing, "read NIfTI image");

    Ok(Image::new(tensor, origin, spacing, Direction(direction)).with_metadata(header_metadata(&header)))
}

fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(VoxspaceError::not_found(path))
    }
}

fn header_geometry(header: &NiftiHeader, path: &Path) -> Result<HeaderGeometry> {
    let ndim = header.dim[0] as usize;
    if !(1..=7).contains(&ndim) {
        return Err(VoxspaceError::io(path, format!("invalid dim[0] = {ndim}")));
    }

    let size = (1..=ndim).map(|i| header.dim[i] as usize).collect();
    let spacing = (1..=ndim)
        .map(|i| {
            let sp = f64::from(header.pixdim[i]).abs();
            if sp > 0.0 && sp.is_finite() {
                sp
            } else {
                1.0
            }
        })
        .collect();

    Ok(HeaderGeometry { size, spacing })
}

/// Voxel-to-world affine, rows `[r0, r1, r2, translation]`.
fn affine(header: &NiftiHeader) -> [[f64; 4]; 4] {
    let rows: [[f32; 4]; 3] = if header.sform_code > 0 {
        [header.srow_x, header.srow_y, header.srow_z]
    } else if header.qform_code > 0 {
        let b = header.quatern_b;
        let c = header.quatern_c;
        let d = header.quatern_d;
        let a = (1.0 - (b * b + c * c + d * d).min(1.0)).sqrt();

        let qfac = if header.pixdim[0] < 0.0 { -1.0 } else { 1.0 };
        let dx = header.pixdim[1];
        let dy = header.pixdim[2];
        let dz = header.pixdim[3] * qfac;

        [
            [
                (a * a + b * b - c * c - d * d) * dx,
                (2.0 * b * c - 2.0 * a * d) * dy,
                (2.0 * b * d + 2.0 * a * c) * dz,
                header.quatern_x,
            ],
            [
                (2.0 * b * c + 2.0 * a * d) * dx,
                (a * a + c * c - b * b - d * d) * dy,
                (2.0 * c * d - 2.0 * a * b) * dz,
                header.quatern_y,
            ],
            [
                (2.0 * b * d - 2.0 * a * c) * dx,
                (2.0 * c * d + 2.0 * a * b) * dy,
                (a * a + d * d - c * c - b * b) * dz,
                header.quatern_z,
            ],
        ]
    } else {
        [
            [header.pixdim[1], 0.0, 0.0, 0.0],
            [0.0, header.pixdim[2], 0.0, 0.0],
            [0.0, 0.0, header.pixdim[3], 0.0],
        ]
    };

    let mut affine = [[0.0f64; 4]; 4];
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            affine[r][c] = f64::from(*value);
        }
    }
    affine[3][3] = 1.0;
    affine
}

fn header_metadata(header: &NiftiHeader) -> MetadataDictionary {
    let text = |bytes: &[u8]| String::from_utf8_lossy(bytes).trim_end_matches('\0').trim().to_string();
    let list = |values: &[String]| values.join(" ");

    let ndim = (header.dim[0] as usize).min(7);
    let dims: Vec<String> = header.dim[..=ndim].iter().map(|v| v.to_string()).collect();
    let pixdims: Vec<String> = header.pixdim[..=ndim].iter().map(|v| v.to_string()).collect();

    [
        ("descrip", text(&header.descrip[..])),
        ("aux_file", text(&header.aux_file[..])),
        ("intent_name", text(&header.intent_name[..])),
        ("datatype", header.datatype.to_string()),
        ("bitpix", header.bitpix.to_string()),
        ("dim", list(&dims)),
        ("pixdim", list(&pixdims)),
        ("qform_code", header.qform_code.to_string()),
        ("sform_code", header.sform_code.to_string()),
        ("xyzt_units", header.xyzt_units.to_string()),
        ("scl_slope", header.scl_slope.to_string()),
        ("scl_inter", header.scl_inter.to_string()),
    ]
    .into_iter()
    .collect()
}
