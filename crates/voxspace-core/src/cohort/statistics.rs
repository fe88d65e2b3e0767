//! Per-axis statistics over a cohort of images.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoxspaceError};

/// Column-wise median of a cohort sample matrix, together with the matrix itself.
///
/// Rows are images, columns are physical axes `(x, y[, z])`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortStatistics {
    pub median: DVector<f64>,
    pub samples: DMatrix<f64>,
}

impl CohortStatistics {
    /// Stack per-image rows and compute the median of every column.
    ///
    /// Fails with [`VoxspaceError::InvalidArgument`] for an empty cohort and with
    /// [`VoxspaceError::DimensionMismatch`] when rows differ in length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let first = rows
            .first()
            .ok_or_else(|| VoxspaceError::invalid_argument("cohort contains no images"))?;
        let dimension = first.as_ref().len();

        let mut flat = Vec::with_capacity(rows.len() * dimension);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != dimension {
                return Err(VoxspaceError::dimension_mismatch(
                    dimension.to_string(),
                    row.len(),
                    format!("cohort row {i}"),
                ));
            }
            flat.extend_from_slice(row);
        }

        let samples = DMatrix::from_row_slice(rows.len(), dimension, &flat);
        let median = DVector::from_iterator(
            dimension,
            (0..dimension).map(|axis| median(&column(&samples, axis))),
        );

        Ok(Self { median, samples })
    }

    /// Number of images.
    pub fn count(&self) -> usize {
        self.samples.nrows()
    }

    /// Number of axes per image.
    pub fn dimension(&self) -> usize {
        self.samples.ncols()
    }

    /// The `q`-th percentile of one axis across the cohort.
    pub fn percentile(&self, axis: usize, q: f64) -> Result<f64> {
        if axis >= self.dimension() {
            return Err(VoxspaceError::invalid_argument(format!(
                "axis {axis} out of range for {}-dimensional cohort",
                self.dimension()
            )));
        }
        percentile(&column(&self.samples, axis), q)
    }
}

fn column(samples: &DMatrix<f64>, axis: usize) -> Vec<f64> {
    samples.column(axis).iter().copied().collect()
}

/// Median of `values`; the mean of the two middle values for even counts.
///
/// Returns NaN for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    let sorted = sorted(values);
    let n = sorted.len();
    match n {
        0 => f64::NAN,
        _ if n % 2 == 1 => sorted[n / 2],
        _ => 0.5 * (sorted[n / 2 - 1] + sorted[n / 2]),
    }
}

/// The `q`-th percentile of `values` with linear interpolation between order statistics.
pub fn percentile(values: &[f64], q: f64) -> Result<f64> {
    if !(0.0..=100.0).contains(&q) {
        return Err(VoxspaceError::invalid_argument(format!(
            "percentile must lie in [0, 100], got {q}"
        )));
    }
    if values.is_empty() {
        return Err(VoxspaceError::invalid_argument("percentile of an empty sample"));
    }

    let sorted = sorted(values);
    let position = q / 100.0 * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&[7.0]), 7.0);
        assert!(median(&[]).is_nan());
    }

    #[test]
    fn test_percentile_linear() -> Result<()> {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&values, 0.0)?, 1.0);
        assert_eq!(percentile(&values, 100.0)?, 5.0);
        assert_eq!(percentile(&values, 50.0)?, 3.0);
        assert!((percentile(&values, 10.0)? - 1.4).abs() < 1e-12);
        assert!((percentile(&[10.0, 0.0], 25.0)? - 2.5).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_percentile_out_of_range() {
        for q in [-1.0, 100.5, f64::NAN] {
            assert!(matches!(percentile(&[1.0], q), Err(VoxspaceError::InvalidArgument(_))));
        }
    }

    #[test]
    fn test_from_rows() -> Result<()> {
        let stats = CohortStatistics::from_rows(&[vec![1.0, 3.0], vec![2.0, 5.0], vec![4.0, 4.0], vec![3.0, 6.0]])?;

        assert_eq!(stats.count(), 4);
        assert_eq!(stats.dimension(), 2);
        assert_eq!(stats.median, DVector::from_vec(vec![2.5, 4.5]));
        assert_eq!(stats.samples[(1, 1)], 5.0);
        Ok(())
    }

    #[test]
    fn test_from_rows_validation() {
        let empty: [Vec<f64>; 0] = [];
        assert!(matches!(
            CohortStatistics::from_rows(&empty),
            Err(VoxspaceError::InvalidArgument(_))
        ));

        let err = CohortStatistics::from_rows(&[vec![1.0, 1.0, 1.0], vec![1.0, 1.0]]).unwrap_err();
        assert!(matches!(err, VoxspaceError::DimensionMismatch { actual: 2, .. }));
    }
}
