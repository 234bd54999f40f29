//! Shared numerical primitives anchored on `nalgebra`.

use nalgebra::Vector3;

use crate::constants::MIN_DIRECTION_COSINE;

/// Primary scalar type used across the crate.
pub type Scalar = f64;
/// Convenient alias for three-dimensional real vectors (x east, y north, z down).
pub type R3 = Vector3<Scalar>;
/// Primary complex scalar type used for phasors.
pub type CScalar = num_complex::Complex<Scalar>;

/// Imaginary unit.
pub const I: CScalar = CScalar::new(0.0, 1.0);

/// Unit vector of an element pointing along `azimuth` (from x towards y) and
/// `dip` (downwards from the horizontal), both in degrees.
///
/// Cosines below [`MIN_DIRECTION_COSINE`] are snapped to zero so that
/// axis-aligned elements project onto exactly one axis.
#[must_use]
pub fn direction_cosines(azimuth_deg: Scalar, dip_deg: Scalar) -> R3 {
    let (sin_azm, cos_azm) = azimuth_deg.to_radians().sin_cos();
    let (sin_dip, cos_dip) = dip_deg.to_radians().sin_cos();
    R3::new(cos_dip * cos_azm, cos_dip * sin_azm, sin_dip)
        .map(|c| if c.abs() < MIN_DIRECTION_COSINE { 0.0 } else { c })
}

/// Horizontal offset and azimuth (radians) from `from` to `to`.
#[must_use]
pub fn offset_and_angle(from: &R3, to: &R3) -> (Scalar, Scalar) {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    (dx.hypot(dy), dy.atan2(dx))
}
