//! Cohort spacing and size statistics gathered from NIfTI headers.
//!
//! Only headers are read, so these functions stay cheap on large cohorts.

use std::path::Path;

use tracing::info;
use voxspace_core::cohort::{target_spacing, CohortStatistics, TargetSpacing, TargetSpacingConfig};
use voxspace_core::error::{Result, VoxspaceError};

use crate::nifti_io::{read_header_geometry, HeaderGeometry};

/// Median spacing over `image_paths`, with the per-image spacing matrix.
pub fn get_median_spacing<P: AsRef<Path>>(image_paths: &[P]) -> Result<CohortStatistics> {
    let statistics = collect(image_paths, |geometry| geometry.spacing)?;
    info!(
        images = statistics.count(),
        median_spacing = ?statistics.median.as_slice(),
        "computed cohort median spacing"
    );
    Ok(statistics)
}

/// Median voxel counts over `image_paths`, with the per-image size matrix.
pub fn get_median_size<P: AsRef<Path>>(image_paths: &[P]) -> Result<CohortStatistics> {
    let statistics = collect(image_paths, |geometry| {
        geometry.size.iter().map(|n| *n as f64).collect()
    })?;
    info!(
        images = statistics.count(),
        median_size = ?statistics.median.as_slice(),
        "computed cohort median size"
    );
    Ok(statistics)
}

/// Target spacing for `image_paths` under `config`.
pub fn get_target_spacing<P: AsRef<Path>>(image_paths: &[P], config: &TargetSpacingConfig) -> Result<TargetSpacing> {
    config.validate()?;
    let statistics = get_median_spacing(image_paths)?;
    let result = target_spacing(&statistics, config)?;
    info!(
        target_spacing = ?result.target.as_slice(),
        median_spacing = ?result.median.as_slice(),
        anisotropy_check = config.anisotropy_check,
        "computed cohort target spacing"
    );
    Ok(result)
}

fn collect<P, F>(image_paths: &[P], row: F) -> Result<CohortStatistics>
where
    P: AsRef<Path>,
    F: Fn(HeaderGeometry) -> Vec<f64>,
{
    if image_paths.is_empty() {
        return Err(VoxspaceError::invalid_argument("cohort contains no images"));
    }

    let mut rows = Vec::with_capacity(image_paths.len());
    let mut dimension = None;
    for path in image_paths {
        let path = path.as_ref();
        let geometry = read_header_geometry(path)?;
        let expected = *dimension.get_or_insert(geometry.dimension());
        if geometry.dimension() != expected {
            return Err(VoxspaceError::dimension_mismatch(
                expected.to_string(),
                geometry.dimension(),
                path.display().to_string(),
            ));
        }
        rows.push(row(geometry));
    }

    CohortStatistics::from_rows(&rows)
}
