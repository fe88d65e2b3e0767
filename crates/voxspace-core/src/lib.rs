pub mod error;
pub mod image;
pub mod spatial;
pub mod transform;
pub mod interpolation;
pub mod filter;
pub mod resampler;
pub mod cohort;

pub use error::{Result, VoxspaceError};
pub use image::{Image, MetadataDictionary};
pub use spatial::{Point, Vector, Spacing, Direction};
pub use interpolation::InterpolationOrder;
pub use resampler::{resample, ResampleOptions};
pub use cohort::{target_spacing, CohortStatistics, TargetSpacing, TargetSpacingConfig};
