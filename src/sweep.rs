//! Frequency/time grids and post-processing helpers.

use crate::math::{CScalar, Scalar};

/// Generates `n` linearly spaced samples in [start, stop].
#[must_use]
pub fn linspace(start: Scalar, stop: Scalar, n: usize) -> Vec<Scalar> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n as Scalar - 1.0);
            (0..n).map(|i| start + step * i as Scalar).collect()
        }
    }
}

/// Generates `n` logarithmically spaced samples between `start` and `stop`.
/// Requires start > 0 and stop > 0.
#[must_use]
pub fn logspace(start: Scalar, stop: Scalar, n: usize) -> Vec<Scalar> {
    assert!(start > 0.0 && stop > 0.0);
    linspace(start.log10(), stop.log10(), n)
        .into_iter()
        .map(|e| 10f64.powf(e))
        .collect()
}

/// Magnitude of complex sequence.
#[must_use]
pub fn mag(values: impl IntoIterator<Item = CScalar>) -> Vec<Scalar> {
    values.into_iter().map(|v| v.norm()).collect()
}

/// Magnitude in dB (20*log10(|x|)), clamping very small values.
#[must_use]
pub fn mag_db(values: impl IntoIterator<Item = CScalar>) -> Vec<Scalar> {
    const MIN: Scalar = 1e-300;
    values
        .into_iter()
        .map(|v| 20.0 * (v.norm().max(MIN)).log10())
        .collect()
}

/// Phase in radians of complex sequence.
#[must_use]
pub fn phase_rad(values: impl IntoIterator<Item = CScalar>) -> Vec<Scalar> {
    values.into_iter().map(|v| v.arg()).collect()
}

/// Phase in degrees of complex sequence.
#[must_use]
pub fn phase_deg(values: impl IntoIterator<Item = CScalar>) -> Vec<Scalar> {
    phase_rad(values).into_iter().map(|r| r.to_degrees()).collect()
}

/// Natural cubic spline through strictly increasing knots.
#[derive(Debug, Clone)]
pub struct NaturalCubicSpline {
    x: Vec<Scalar>,
    y: Vec<Scalar>,
    curvature: Vec<Scalar>,
}

impl NaturalCubicSpline {
    /// Builds the spline; `x` must be strictly increasing and as long as `y`.
    #[must_use]
    pub fn new(x: &[Scalar], y: &[Scalar]) -> Self {
        let n = x.len().min(y.len());
        let mut curvature = vec![0.0; n];
        if n > 2 {
            // Tridiagonal solve for the interior second derivatives.
            let mut diag = vec![0.0; n];
            let mut rhs = vec![0.0; n];
            for i in 1..n - 1 {
                let h0 = x[i] - x[i - 1];
                let h1 = x[i + 1] - x[i];
                diag[i] = 2.0 * (h0 + h1);
                rhs[i] = 6.0 * ((y[i + 1] - y[i]) / h1 - (y[i] - y[i - 1]) / h0);
            }
            for i in 2..n - 1 {
                let h = x[i] - x[i - 1];
                let m = h / diag[i - 1];
                diag[i] -= m * h;
                rhs[i] -= m * rhs[i - 1];
            }
            for i in (1..n - 1).rev() {
                let h1 = x[i + 1] - x[i];
                curvature[i] = (rhs[i] - h1 * curvature[i + 1]) / diag[i];
            }
        }
        Self {
            x: x[..n].to_vec(),
            y: y[..n].to_vec(),
            curvature,
        }
    }

    /// Evaluates the spline, extrapolating with the end cubics.
    #[must_use]
    pub fn eval(&self, at: Scalar) -> Scalar {
        match self.x.len() {
            0 => return Scalar::NAN,
            1 => return self.y[0],
            _ => {}
        }
        let upper = self.x.partition_point(|&xi| xi <= at).clamp(1, self.x.len() - 1);
        let lower = upper - 1;
        let h = self.x[upper] - self.x[lower];
        let a = (self.x[upper] - at) / h;
        let b = (at - self.x[lower]) / h;
        a * self.y[lower]
            + b * self.y[upper]
            + ((a * a * a - a) * self.curvature[lower] + (b * b * b - b) * self.curvature[upper])
                * h
                * h
                / 6.0
    }
}
