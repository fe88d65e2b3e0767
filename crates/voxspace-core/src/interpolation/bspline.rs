//! B-Spline interpolation implementation.
//!
//! Cubic B-spline interpolation in two stages: the samples are first converted to
//! B-spline coefficients with a separable recursive filter (mirror boundaries), then
//! each query point is evaluated from the `4^D` coefficients around it. Because of the
//! prefilter the interpolant passes exactly through the input samples.

use burn::tensor::backend::Backend;
use burn::tensor::{Shape, Tensor, TensorData};

use super::trait_::{strides, Interpolator};
use crate::error::{Result, VoxspaceError};

/// Pole of the cubic B-spline prefilter, `sqrt(3) - 2`.
const POLE: f64 = -0.267_949_192_431_122_7;

/// Truncation tolerance for the causal initialisation sum.
const TOLERANCE: f64 = 1e-10;

/// Cubic B-Spline basis function.
///
/// - (2/3) - |x|^2 + (1/2)|x|^3    for |x| < 1
/// - (1/6)(2 - |x|)^3              for 1 <= |x| < 2
/// - 0                             otherwise
fn cubic_bspline(x: f64) -> f64 {
    let abs_x = x.abs();
    if abs_x < 1.0 {
        (2.0 / 3.0) - abs_x.powi(2) + 0.5 * abs_x.powi(3)
    } else if abs_x < 2.0 {
        let two_minus_x = 2.0 - abs_x;
        (1.0 / 6.0) * two_minus_x.powi(3)
    } else {
        0.0
    }
}

/// Cubic B-Spline interpolator.
#[derive(Debug, Clone, Copy, Default)]
pub struct BSplineInterpolator;

impl BSplineInterpolator {
    /// Create a new B-Spline interpolator.
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Interpolator<B> for BSplineInterpolator {
    fn interpolate<const D: usize>(&self, data: &Tensor<B, D>, indices: Tensor<B, 2>) -> Result<Tensor<B, 1>> {
        let device = indices.device();
        let [n_points, rank] = indices.dims();
        if rank != D {
            return Err(VoxspaceError::dimension_mismatch(
                D.to_string(),
                rank,
                "B-spline index columns",
            ));
        }

        let dims = data.dims();
        let samples = to_f64_vec(data.to_data())?;
        let coefficients = compute_coefficients(samples, dims);

        let coords = to_f64_vec(indices.into_data())?;
        let values: Vec<f32> = coords
            .chunks_exact(D)
            .map(|point| evaluate(&coefficients, dims, point) as f32)
            .collect();

        Ok(Tensor::<B, 1>::from_data(
            TensorData::new(values, Shape::new([n_points])),
            &device,
        ))
    }
}

fn to_f64_vec(data: TensorData) -> Result<Vec<f64>> {
    data.convert::<f32>()
        .to_vec::<f32>()
        .map(|values| values.into_iter().map(f64::from).collect())
        .map_err(|e| VoxspaceError::tensor(format!("{:?}", e)))
}

/// Convert samples laid out row-major in `dims` into cubic B-spline coefficients.
fn compute_coefficients<const D: usize>(mut values: Vec<f64>, dims: [usize; D]) -> Vec<f64> {
    let strides = strides(dims);
    let mut line = Vec::new();

    for axis in 0..D {
        let n = dims[axis];
        if n < 2 {
            continue;
        }
        let stride = strides[axis];
        let outer: usize = dims[..axis].iter().product();

        for o in 0..outer {
            for inner in 0..stride {
                let base = o * n * stride + inner;
                line.clear();
                line.extend((0..n).map(|i| values[base + i * stride]));
                decompose_line(&mut line);
                for (i, c) in line.iter().enumerate() {
                    values[base + i * stride] = *c;
                }
            }
        }
    }

    values
}

/// In-place causal/anti-causal recursive filter along one line.
fn decompose_line(c: &mut [f64]) {
    let n = c.len();
    if n < 2 {
        return;
    }

    let gain = (1.0 - POLE) * (1.0 - 1.0 / POLE);
    for v in c.iter_mut() {
        *v *= gain;
    }

    c[0] = initial_causal_coefficient(c);
    for k in 1..n {
        c[k] += POLE * c[k - 1];
    }

    c[n - 1] = (POLE / (POLE * POLE - 1.0)) * (POLE * c[n - 2] + c[n - 1]);
    for k in (0..n - 1).rev() {
        c[k] = POLE * (c[k + 1] - c[k]);
    }
}

fn initial_causal_coefficient(c: &[f64]) -> f64 {
    let n = c.len();
    let horizon = (TOLERANCE.ln() / POLE.abs().ln()).ceil() as usize;

    if horizon < n {
        let mut zn = POLE;
        let mut sum = c[0];
        for value in c.iter().take(horizon).skip(1) {
            sum += zn * value;
            zn *= POLE;
        }
        sum
    } else {
        // Exact mirror-symmetric sum for short lines.
        let iz = 1.0 / POLE;
        let mut zn = POLE;
        let mut z2n = POLE.powi(n as i32 - 1);
        let mut sum = c[0] + z2n * c[n - 1];
        z2n *= z2n * iz;
        for value in c.iter().take(n - 1).skip(1) {
            sum += (zn + z2n) * value;
            zn *= POLE;
            z2n *= iz;
        }
        sum / (1.0 - zn * zn)
    }
}

/// Mirror an out-of-range index back into `[0, n)`.
fn mirror(index: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let period = 2 * (n as isize - 1);
    let folded = index.rem_euclid(period);
    if folded >= n as isize {
        (period - folded) as usize
    } else {
        folded as usize
    }
}

/// Evaluate the spline at `point` (physical axis order).
fn evaluate<const D: usize>(coefficients: &[f64], dims: [usize; D], point: &[f64]) -> f64 {
    let strides = strides(dims);

    // Per tensor axis: the four support offsets and weights.
    let mut offsets = [[0usize; 4]; D];
    let mut weights = [[0.0f64; 4]; D];
    for axis in 0..D {
        let x = point[D - 1 - axis];
        let start = x.floor() as isize - 1;
        for j in 0..4 {
            let idx = start + j as isize;
            offsets[axis][j] = mirror(idx, dims[axis]) * strides[axis];
            weights[axis][j] = cubic_bspline(x - idx as f64);
        }
    }

    let mut value = 0.0;
    for combo in 0..4usize.pow(D as u32) {
        let mut rest = combo;
        let mut offset = 0;
        let mut weight = 1.0;
        for axis in 0..D {
            let j = rest % 4;
            rest /= 4;
            offset += offsets[axis][j];
            weight *= weights[axis][j];
        }
        value += weight * coefficients[offset];
    }
    value
}
