pub mod nifti_io;
pub mod cohort;

pub use nifti_io::{read_header_geometry, read_nifti, HeaderGeometry};
pub use cohort::{get_median_size, get_median_spacing, get_target_spacing};
