//! Wavenumber-to-space transform of layered-earth kernels.

use std::f64::consts::PI;
use std::sync::Arc;

use log::warn;

use crate::errors::{PrecisionWarning, StrataError, TransformKind};
use crate::math::{CScalar, Scalar};
use crate::transform::filters::HankelFilter;
use crate::transform::quadrature::{integrate_panels, AdaptiveParams};
use crate::transform::special::{bessel_j0, bessel_j1};

/// Wavenumber-domain kernel at one λ, split by the Bessel function it is
/// integrated against.
///
/// `j0` and `j0b` both pair with `J0` but carry different angular factors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpectralTerms {
    /// Term against `J0` with the `J0` angular factor.
    pub j0: CScalar,
    /// Term against `J1`.
    pub j1: CScalar,
    /// Term against `J0` with the second angular factor.
    pub j0b: CScalar,
}

/// Angular multipliers of the three spectral terms for one source–receiver
/// azimuth. The `j1` factor includes the `1/r` of the horizontal components.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AngularFactors {
    /// Factor of `j0`.
    pub j0: Scalar,
    /// Factor of `j1`, including `1/r`.
    pub j1: Scalar,
    /// Factor of `j0b`.
    pub j0b: Scalar,
}

impl AngularFactors {
    /// True when every factor vanishes and the transform is identically zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.j0 == 0.0 && self.j1 == 0.0 && self.j0b == 0.0
    }
}

impl SpectralTerms {
    /// Integrands against `J0` and `J1` after applying the angular factors.
    #[must_use]
    pub fn weighted(&self, factors: &AngularFactors) -> (CScalar, CScalar) {
        (
            self.j0 * factors.j0 + self.j0b * factors.j0b,
            self.j1 * factors.j1,
        )
    }
}

/// Integration scheme over wavenumber.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub enum HankelMethod {
    /// Digital linear filter: one pass over the filter abscissae.
    Dlf(Arc<HankelFilter>),
    /// Quadrature between Bessel zeros with ε-algorithm extrapolation.
    Qwe(AdaptiveParams),
    /// Plain panel quadrature without extrapolation.
    Quad(AdaptiveParams),
}

impl HankelMethod {
    /// Filter method with the default `erf_30` filter.
    #[must_use]
    pub fn dlf() -> Self {
        Self::Dlf(HankelFilter::erf_30())
    }

    /// QWE with default tolerances.
    #[must_use]
    pub fn qwe() -> Self {
        Self::Qwe(AdaptiveParams::hankel())
    }

    /// Panel quadrature with a budget suited to summing without extrapolation.
    #[must_use]
    pub fn quad() -> Self {
        Self::Quad(AdaptiveParams {
            rtol: 1.0e-10,
            max_intervals: 2000,
            ..AdaptiveParams::hankel()
        })
    }

    pub(crate) fn validate(&self) -> Result<(), StrataError> {
        match self {
            Self::Dlf(_) => Ok(()),
            Self::Qwe(params) | Self::Quad(params) => params.validate(),
        }
    }
}

impl Default for HankelMethod {
    fn default() -> Self {
        Self::dlf()
    }
}

/// Spatial-domain value `∫ [w0(λ) J0(λr) + w1(λ) J1(λr)] dλ` of a kernel at
/// horizontal offset `offset > 0`, with `(w0, w1)` from
/// [`SpectralTerms::weighted`].
///
/// Adaptive methods that miss their tolerance still return their best
/// estimate, together with a [`PrecisionWarning`].
pub fn hankel<K>(
    kernel: K,
    offset: Scalar,
    factors: &AngularFactors,
    method: &HankelMethod,
) -> (CScalar, Option<PrecisionWarning>)
where
    K: Fn(Scalar) -> SpectralTerms,
{
    if factors.is_zero() {
        return (CScalar::new(0.0, 0.0), None);
    }
    match method {
        HankelMethod::Dlf(filter) => {
            let sum = filter
                .base()
                .iter()
                .zip(filter.j0())
                .zip(filter.j1())
                .map(|((&b, &w0), &w1)| {
                    let (k0, k1) = kernel(b / offset).weighted(factors);
                    k0 * w0 + k1 * w1
                })
                .sum::<CScalar>();
            (sum / offset, None)
        }
        HankelMethod::Qwe(params) | HankelMethod::Quad(params) => {
            let extrapolate = matches!(method, HankelMethod::Qwe(_));
            let mut value = CScalar::new(0.0, 0.0);
            let mut intervals = 0;
            let mut converged = true;

            if factors.j0 != 0.0 || factors.j0b != 0.0 {
                let part = integrate_panels(
                    |lambdas| {
                        lambdas
                            .iter()
                            .map(|&l| kernel(l).weighted(factors).0 * bessel_j0(l * offset))
                            .collect()
                    },
                    |k| (k as Scalar + 0.75) * PI / offset,
                    params,
                    extrapolate,
                );
                value += part.value;
                intervals = intervals.max(part.intervals);
                converged &= part.converged;
            }
            if factors.j1 != 0.0 {
                let part = integrate_panels(
                    |lambdas| {
                        lambdas
                            .iter()
                            .map(|&l| kernel(l).weighted(factors).1 * bessel_j1(l * offset))
                            .collect()
                    },
                    |k| (k as Scalar + 1.25) * PI / offset,
                    params,
                    extrapolate,
                );
                value += part.value;
                intervals = intervals.max(part.intervals);
                converged &= part.converged;
            }

            let warning = (!converged).then(|| {
                let warning = PrecisionWarning {
                    transform: TransformKind::Hankel,
                    at: offset,
                    intervals,
                };
                warn!("{warning}");
                warning
            });
            (value, warning)
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    // ∫ e^{-aλ} J0(λr) dλ and ∫ e^{-aλ} J1(λr) dλ for a = 1
    fn lipschitz(r: Scalar) -> (Scalar, Scalar) {
        let s = (1.0 + r * r).sqrt();
        (1.0 / s, (s - 1.0) / (r * s))
    }

    fn exponential_kernel(lambda: Scalar) -> SpectralTerms {
        let e = CScalar::new((-lambda).exp(), 0.0);
        SpectralTerms {
            j0: e,
            j1: e,
            j0b: e * 2.0,
        }
    }

    #[test]
    fn factors_select_and_scale_terms() {
        let factors = AngularFactors {
            j0: 1.0,
            j1: 0.5,
            j0b: -0.25,
        };
        let (w0, w1) = exponential_kernel(0.0).weighted(&factors);
        assert_relative_eq!(w0.re, 0.5);
        assert_relative_eq!(w1.re, 0.5);
    }

    #[test]
    fn all_methods_agree_with_closed_form() {
        let factors = AngularFactors {
            j0: 1.0,
            j1: 1.0,
            j0b: 0.0,
        };
        for r in [0.5, 3.0] {
            let (j0, j1) = lipschitz(r);
            for (method, tol) in [
                (HankelMethod::dlf(), 1.0e-7),
                (HankelMethod::qwe(), 1.0e-9),
                (HankelMethod::quad(), 1.0e-7),
            ] {
                let (value, warning) = hankel(exponential_kernel, r, &factors, &method);
                assert!(warning.is_none());
                assert_relative_eq!(value.re, j0 + j1, max_relative = tol);
                assert_relative_eq!(value.im, 0.0, epsilon = 1.0e-12);
            }
        }
    }

    #[test]
    fn zero_factors_short_circuit() {
        let (value, warning) =
            hankel(exponential_kernel, 1.0, &AngularFactors::default(), &HankelMethod::qwe());
        assert_eq!(value, CScalar::new(0.0, 0.0));
        assert!(warning.is_none());
    }

    #[test]
    fn exhausted_budget_yields_warning() {
        let method = HankelMethod::Quad(AdaptiveParams {
            max_intervals: 2,
            ..AdaptiveParams::hankel()
        });
        let factors = AngularFactors {
            j0: 1.0,
            ..AngularFactors::default()
        };
        let flat = |_: Scalar| SpectralTerms {
            j0: CScalar::new(1.0, 0.0),
            ..SpectralTerms::default()
        };
        let (_, warning) = hankel(flat, 1.0, &factors, &method);
        let warning = warning.expect("budget of two intervals cannot converge");
        assert_eq!(warning.transform, TransformKind::Hankel);
        assert_eq!(warning.intervals, 2);
    }
}
