//! Baseline physical constants and modelling limits.
//!
//! ## Accuracy
//!
//! Measured constants (ε₀, μ₀) are provided with 11-12 significant figures, which is
//! far below the accuracy of any layered-earth forward model.
//!
//! ## References
//!
//! Physical constants are based on CODATA recommended values:
//! - NIST Reference on Constants, Units, and Uncertainty: <https://physics.nist.gov/cuu/Constants/>
//! - CODATA 2018 values published May 20, 2019 (following 2019 SI redefinition)

use std::f64::consts::PI;

/// Vacuum permittivity ε₀ in farads per meter (F/m).
/// Approximate value: 8.8541878128 × 10⁻¹² F/m (11 significant figures).
pub const VACUUM_PERMITTIVITY: f64 = 8.854_187_812_8e-12;
/// Vacuum permeability μ₀ in henries per meter (H/m).
/// Approximate value: 1.25663706212 × 10⁻⁶ H/m (12 significant figures).
pub const VACUUM_PERMEABILITY: f64 = 1.256_637_062_12e-6;

/// Smallest horizontal source-receiver offset in meters.
///
/// Offsets below this value are clamped, the Bessel-function integrals being
/// singular at zero offset.
pub const MIN_OFFSET: f64 = 1.0e-3;
/// Smallest admissible resistivity in ohm-meters; zero is clamped to this value.
pub const MIN_RESISTIVITY: f64 = 1.0e-20;
/// Direction cosines with a magnitude below this value are treated as zero.
pub const MIN_DIRECTION_COSINE: f64 = 1.0e-10;

/// Returns the angular frequency corresponding to a linear frequency `hz`.
#[inline]
#[must_use]
pub fn angular_frequency(hz: f64) -> f64 {
    2.0 * PI * hz
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn vacuum_constants_give_speed_of_light() {
        let c = 1.0 / (VACUUM_PERMITTIVITY * VACUUM_PERMEABILITY).sqrt();
        assert_relative_eq!(c, 299_792_458.0, max_relative = 1.0e-9);
    }

    #[test]
    fn angular_frequency_scales_by_two_pi() {
        assert_relative_eq!(angular_frequency(0.5), PI, epsilon = 1.0e-15);
    }
}
