//! Target spacing policy with an anisotropy check.
//!
//! The cohort median spacing is the default target. For strongly anisotropic cohorts
//! (the coarsest axis more than three times the finest) one axis is pulled towards its
//! percentile instead, so that a handful of very coarse scans do not dictate the grid.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::statistics::CohortStatistics;
use crate::error::{Result, VoxspaceError};

/// Ratio between the coarsest and finest median spacing that counts as anisotropic.
const ANISOTROPY_RATIO: f64 = 3.0;

/// Configuration for [`target_spacing`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSpacingConfig {
    /// Apply the anisotropy override.
    pub anisotropy_check: bool,
    /// Percentile (0..=100) used for the overridden axis.
    pub anisotropy_percentile: f64,
}

impl Default for TargetSpacingConfig {
    fn default() -> Self {
        Self {
            anisotropy_check: true,
            anisotropy_percentile: 10.0,
        }
    }
}

impl TargetSpacingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_anisotropy_check(mut self, enabled: bool) -> Self {
        self.anisotropy_check = enabled;
        self
    }

    pub fn with_anisotropy_percentile(mut self, percentile: f64) -> Self {
        self.anisotropy_percentile = percentile;
        self
    }

    /// Reject percentiles outside `[0, 100]`.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.anisotropy_percentile) {
            return Err(VoxspaceError::invalid_argument(format!(
                "anisotropy percentile must lie in [0, 100], got {}",
                self.anisotropy_percentile
            )));
        }
        Ok(())
    }
}

/// Recommended spacing for a cohort together with its median spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSpacing {
    pub target: DVector<f64>,
    pub median: DVector<f64>,
}

/// Derive the target spacing from cohort spacing statistics.
///
/// * 2D: if `median[large] > 3 * median[small]`, the large axis takes its
///   `anisotropy_percentile`-th percentile.
/// * 3D: under the same condition, the large axis takes its `p`-th percentile when
///   `median[large] / median[normal] > median[normal] / median[small]`; otherwise the
///   small axis takes its `(100 - p)`-th percentile.
/// * Any other dimensionality, or a disabled check: the median.
///
/// `small` and `large` are the first axes holding the minimum and maximum median;
/// `normal` is the lowest remaining axis.
pub fn target_spacing(statistics: &CohortStatistics, config: &TargetSpacingConfig) -> Result<TargetSpacing> {
    config.validate()?;

    let median = statistics.median.clone();
    let mut target = median.clone();
    let p = config.anisotropy_percentile;

    if config.anisotropy_check && matches!(median.len(), 2 | 3) {
        let small = first_argmin(&median);
        let large = first_argmax(&median);

        if median[small] * ANISOTROPY_RATIO < median[large] {
            if median.len() == 2 {
                target[large] = statistics.percentile(large, p)?;
            } else {
                let normal = (0..3)
                    .find(|axis| *axis != small && *axis != large)
                    .unwrap_or(small);
                if median[large] / median[normal] > median[normal] / median[small] {
                    target[large] = statistics.percentile(large, p)?;
                } else {
                    target[small] = statistics.percentile(small, 100.0 - p)?;
                }
            }
            debug!(
                median = ?median.as_slice(),
                target = ?target.as_slice(),
                "anisotropic cohort, overriding median spacing"
            );
        }
    }

    Ok(TargetSpacing { target, median })
}

fn first_argmin(values: &DVector<f64>) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v < values[best] {
            best = i;
        }
    }
    best
}

fn first_argmax(values: &DVector<f64>) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
