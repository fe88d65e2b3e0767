//! Cohort spacing statistics and the target-spacing policy.
//!
//! These operate on per-image spacing (or size) rows already gathered by the caller;
//! `voxspace-io` gathers them from NIfTI headers.

pub mod statistics;
pub mod target;

pub use statistics::{median, percentile, CohortStatistics};
pub use target::{target_spacing, TargetSpacing, TargetSpacingConfig};
