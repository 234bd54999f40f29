//! Gauss–Legendre panels and the quadrature-with-extrapolation driver shared by
//! the adaptive Hankel and Fourier engines.

use std::f64::consts::PI;

use crate::errors::StrataError;
use crate::math::{CScalar, Scalar};

/// Gauss–Legendre nodes and weights on `[-1, 1]`, computed by Newton
/// iteration on the Legendre polynomial `P_n`.
#[must_use]
pub fn gauss_legendre(n: usize) -> (Vec<Scalar>, Vec<Scalar>) {
    let mut points = vec![0.0; n];
    let mut weights = vec![0.0; n];
    let nf = n as Scalar;
    for i in 0..n.div_ceil(2) {
        // Chebyshev-like initial guess for the i-th root
        let mut x = (PI * (i as Scalar + 0.75) / (nf + 0.5)).cos();
        let mut derivative = 1.0;
        for _ in 0..100 {
            let (p, dp) = legendre_with_derivative(n, x);
            derivative = dp;
            let step = p / dp;
            x -= step;
            if step.abs() < 1.0e-15 {
                break;
            }
        }
        let (_, dp) = legendre_with_derivative(n, x);
        if dp.is_finite() {
            derivative = dp;
        }
        let w = 2.0 / ((1.0 - x * x) * derivative * derivative);
        points[i] = -x;
        points[n - 1 - i] = x;
        weights[i] = w;
        weights[n - 1 - i] = w;
    }
    (points, weights)
}

fn legendre_with_derivative(n: usize, x: Scalar) -> (Scalar, Scalar) {
    let mut p0 = 1.0;
    let mut p1 = x;
    if n == 0 {
        return (1.0, 0.0);
    }
    for k in 2..=n {
        let kf = k as Scalar;
        let p2 = ((2.0 * kf - 1.0) * x * p1 - (kf - 1.0) * p0) / kf;
        p0 = p1;
        p1 = p2;
    }
    let dp = n as Scalar * (x * p1 - p0) / (x * x - 1.0);
    (p1, dp)
}

/// Gauss–Legendre rule mapped onto arbitrary panels.
#[derive(Debug, Clone)]
pub struct Panel {
    points: Vec<Scalar>,
    weights: Vec<Scalar>,
}

impl Panel {
    /// `n`-point rule.
    #[must_use]
    pub fn new(n: usize) -> Self {
        let (points, weights) = gauss_legendre(n);
        Self { points, weights }
    }

    /// Abscissae of the rule on `[a, b]`.
    #[must_use]
    pub fn abscissae(&self, a: Scalar, b: Scalar) -> Vec<Scalar> {
        let half = 0.5 * (b - a);
        let mid = 0.5 * (b + a);
        self.points.iter().map(|&p| mid + half * p).collect()
    }

    /// Applies the rule on `[a, b]` to integrand samples taken at
    /// [`Panel::abscissae`].
    #[must_use]
    pub fn integrate(&self, a: Scalar, b: Scalar, samples: &[CScalar]) -> CScalar {
        let half = 0.5 * (b - a);
        samples
            .iter()
            .zip(&self.weights)
            .map(|(s, &w)| s * w)
            .sum::<CScalar>()
            * half
    }
}

/// Tolerances and budget of the adaptive quadratures.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveParams {
    /// Relative tolerance on successive extrapolated estimates.
    pub rtol: Scalar,
    /// Absolute tolerance on successive extrapolated estimates.
    pub atol: Scalar,
    /// Gauss–Legendre points per interval.
    pub nquad: usize,
    /// Maximum number of intervals before a precision warning is raised.
    pub max_intervals: usize,
}

impl AdaptiveParams {
    /// Defaults for wavenumber integration.
    #[must_use]
    pub const fn hankel() -> Self {
        Self {
            rtol: 1.0e-12,
            atol: 1.0e-30,
            nquad: 51,
            max_intervals: 40,
        }
    }

    /// Defaults for frequency-to-time integration.
    #[must_use]
    pub const fn fourier() -> Self {
        Self {
            rtol: 1.0e-8,
            atol: 1.0e-20,
            nquad: 21,
            max_intervals: 200,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), StrataError> {
        if !(self.rtol.is_finite() && self.rtol >= 0.0 && self.atol.is_finite() && self.atol >= 0.0)
        {
            return Err(StrataError::InvalidSurvey(format!(
                "tolerances must be finite and non-negative (rtol {}, atol {})",
                self.rtol, self.atol
            )));
        }
        if self.nquad == 0 || self.max_intervals == 0 {
            return Err(StrataError::InvalidSurvey(
                "nquad and max_intervals must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for AdaptiveParams {
    fn default() -> Self {
        Self::hankel()
    }
}

/// Incremental Wynn ε-algorithm over a sequence of partial sums.
#[derive(Debug, Default)]
pub(crate) struct EpsilonTable {
    diagonal: Vec<CScalar>,
}

impl EpsilonTable {
    /// Appends the next partial sum and returns the current best estimate.
    pub(crate) fn push(&mut self, partial: CScalar) -> CScalar {
        let mut next = Vec::with_capacity(self.diagonal.len() + 1);
        next.push(partial);
        for j in 1..=self.diagonal.len() {
            let diff = next[j - 1] - self.diagonal[j - 1];
            if diff.norm() == 0.0 {
                break;
            }
            let before = if j >= 2 { self.diagonal[j - 2] } else { CScalar::new(0.0, 0.0) };
            next.push(before + diff.inv());
        }
        self.diagonal = next;
        let last_even = (self.diagonal.len() - 1) & !1;
        self.diagonal[last_even]
    }
}

/// Result of an adaptive integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Adaptive {
    pub value: CScalar,
    pub converged: bool,
    pub intervals: usize,
}

/// Lower edge, in decades below the first breakpoint, of the geometric
/// sub-panels covering the first interval.
const FIRST_INTERVAL_DECADES: i32 = 6;

/// Integrates over `[0, ∞)` panel by panel, with panel `k` spanning
/// `[breakpoint(k - 1), breakpoint(k)]` and `breakpoint(-1) = 0`.
///
/// `samples` maps a set of abscissae to integrand values. With `extrapolate`
/// the partial sums are accelerated by the ε-algorithm (QWE); without, the
/// plain sum is returned once three consecutive panels are negligible.
pub(crate) fn integrate_panels<F, B>(
    mut samples: F,
    breakpoint: B,
    params: &AdaptiveParams,
    extrapolate: bool,
) -> Adaptive
where
    F: FnMut(&[Scalar]) -> Vec<CScalar>,
    B: Fn(usize) -> Scalar,
{
    let rule = Panel::new(params.nquad);
    let mut integrate = |a: Scalar, b: Scalar| {
        let x = rule.abscissae(a, b);
        rule.integrate(a, b, &samples(&x))
    };

    // The first interval holds the integrable singularities at the origin,
    // so it is covered by geometrically growing sub-panels.
    let first = breakpoint(0);
    let mut edges = vec![0.0];
    edges.extend(
        (0..=2 * FIRST_INTERVAL_DECADES)
            .map(|i| first * 10f64.powf(0.5 * Scalar::from(i - 2 * FIRST_INTERVAL_DECADES))),
    );
    let mut sum: CScalar = edges.windows(2).map(|w| integrate(w[0], w[1])).sum();

    let mut table = EpsilonTable::default();
    let mut estimate = if extrapolate { table.push(sum) } else { sum };
    let mut quiet_panels = 0;
    for k in 1..params.max_intervals {
        let contribution = integrate(breakpoint(k - 1), breakpoint(k));
        sum += contribution;
        let previous = estimate;
        estimate = if extrapolate { table.push(sum) } else { sum };
        let tolerance = params.rtol * estimate.norm() + params.atol;
        if extrapolate {
            if k >= 2 && (estimate - previous).norm() <= tolerance {
                return Adaptive {
                    value: estimate,
                    converged: true,
                    intervals: k + 1,
                };
            }
        } else {
            quiet_panels = if contribution.norm() <= tolerance { quiet_panels + 1 } else { 0 };
            if quiet_panels == 3 {
                return Adaptive {
                    value: estimate,
                    converged: true,
                    intervals: k + 1,
                };
            }
        }
    }
    Adaptive {
        value: estimate,
        converged: false,
        intervals: params.max_intervals,
    }
}
