//! Special functions needed by the transform engines.
//!
//! Real Bessel functions and the error function come from `libm`; the complex
//! log-gamma uses upward recurrence to Re z ≥ 10 followed by the Stirling series.

use std::f64::consts::PI;

use crate::math::{CScalar, Scalar};

/// Bessel function of the first kind of order zero.
#[inline]
#[must_use]
pub fn bessel_j0(x: Scalar) -> Scalar {
    libm::j0(x)
}

/// Bessel function of the first kind of order one.
#[inline]
#[must_use]
pub fn bessel_j1(x: Scalar) -> Scalar {
    libm::j1(x)
}

/// Error function.
#[inline]
#[must_use]
pub fn erf(x: Scalar) -> Scalar {
    libm::erf(x)
}

/// Principal-ish branch of ln Γ(z) for complex `z` away from the poles.
///
/// The imaginary part may differ from the principal branch by a multiple of
/// 2π, which is irrelevant once the result is exponentiated.
#[must_use]
pub fn ln_gamma(z: CScalar) -> CScalar {
    let mut z = z;
    let mut shift = CScalar::new(0.0, 0.0);
    while z.re < 10.0 {
        shift += z.ln();
        z += 1.0;
    }
    let inv = z.inv();
    let inv2 = inv * inv;
    // Bernoulli terms B_2k / (2k (2k-1) z^(2k-1)), k = 1..5
    let series = inv
        * (1.0 / 12.0
            - inv2 * (1.0 / 360.0 - inv2 * (1.0 / 1260.0 - inv2 * (1.0 / 1680.0 - inv2 / 1188.0))));
    (z - 0.5) * z.ln() - z + 0.5 * (2.0 * PI).ln() + series - shift
}

/// Complex gamma function Γ(z).
#[must_use]
pub fn gamma(z: CScalar) -> CScalar {
    ln_gamma(z).exp()
}
