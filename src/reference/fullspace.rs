//! Closed-form fields of point dipoles in an unbounded VTI medium.

use std::f64::consts::PI;

use crate::constants::MIN_OFFSET;
use crate::materials::LayerResponse;
use crate::math::{CScalar, Scalar, R3};
use crate::orientation::{Axis, Duality, ElementaryCode, FieldKind, OrientationCode};

/// Field of component `ab` at `receiver` for a unit dipole at `source` in a
/// homogeneous medium with the given admittivities and impedivities.
///
/// Horizontal offsets below [`MIN_OFFSET`] are clamped onto the x-axis.
#[must_use]
pub fn fullspace(
    source: &R3,
    receiver: &R3,
    medium: &LayerResponse,
    ab: OrientationCode,
) -> CScalar {
    let (code, duality) = ab.reduce();
    match duality {
        Duality::Direct => elementary(&(receiver - source), medium, code),
        Duality::DualMedium => elementary(&(receiver - source), &medium.dual(), code),
        Duality::Reciprocal => -elementary(&(source - receiver), medium, code),
    }
}

/// Gradient terms of the scalar potential `e^{-τR} / (2π√a R)` of one mode,
/// with `R² = ρ² + a z²`.
struct ModePotential {
    value: CScalar,
    first: CScalar,
    second: CScalar,
    r: CScalar,
    tau: CScalar,
    anisotropy: CScalar,
    q: [CScalar; 3],
}

impl ModePotential {
    fn new(d: &R3, rho: Scalar, gamma: CScalar, anisotropy: CScalar) -> Self {
        let r = (anisotropy * d.z * d.z + rho * rho).sqrt();
        let tau = gamma / anisotropy.sqrt();
        let value = (-tau * r).exp() / (2.0 * PI * anisotropy.sqrt() * r);
        let inv = r.inv();
        let first = -(tau + inv) * value;
        let second = ((tau + inv) * (tau + inv) + inv * inv) * value;
        Self {
            value,
            first,
            second,
            r,
            tau,
            anisotropy,
            q: [CScalar::new(d.x, 0.0), CScalar::new(d.y, 0.0), anisotropy * d.z],
        }
    }

    /// ∂/∂x_i of the potential.
    fn d1(&self, i: usize) -> CScalar {
        self.first * self.q[i] / self.r
    }

    /// ∂²/∂x_i∂x_j of the potential.
    fn d2(&self, i: usize, j: usize) -> CScalar {
        let r2 = self.r * self.r;
        let mut out = (self.second - self.first / self.r) * self.q[i] * self.q[j] / r2;
        if i == j {
            let weight = if i == 2 { self.anisotropy } else { CScalar::new(1.0, 0.0) };
            out += self.first / self.r * weight;
        }
        out
    }

    /// `e^{-τR}` and its derivative with respect to ρ.
    fn decay(&self, rho: Scalar) -> (CScalar, CScalar) {
        let u = (-self.tau * self.r).exp();
        (u, -self.tau * rho / self.r * u)
    }
}

/// Horizontal second derivatives of a radial function `P(ρ)` given `P'/ρ`-type
/// terms `pr` (first) and `prr` (second).
struct Radial {
    x: Scalar,
    y: Scalar,
    rho: Scalar,
}

impl Radial {
    fn xx(&self, pr: CScalar, prr: CScalar) -> CScalar {
        prr * (self.x * self.x / (self.rho * self.rho)) + pr * (self.y * self.y / self.rho.powi(3))
    }

    fn yy(&self, pr: CScalar, prr: CScalar) -> CScalar {
        prr * (self.y * self.y / (self.rho * self.rho)) + pr * (self.x * self.x / self.rho.powi(3))
    }

    fn xy(&self, pr: CScalar, prr: CScalar) -> CScalar {
        (prr - pr / self.rho) * (self.x * self.y / (self.rho * self.rho))
    }
}

/// Fullspace value of an elementary component for `d = receiver − source`.
pub(crate) fn elementary(d: &R3, medium: &LayerResponse, code: ElementaryCode) -> CScalar {
    let mut d = *d;
    if d.x.hypot(d.y) < MIN_OFFSET {
        d.x = MIN_OFFSET;
        d.y = 0.0;
    }
    let rho = d.x.hypot(d.y);
    let (eta_h, eta_v, zeta_h, zeta_v) = (medium.eta_h, medium.eta_v, medium.zeta_h, medium.zeta_v);
    let gamma = medium.wavenumber_sq().sqrt();
    let tm = ModePotential::new(&d, rho, gamma, eta_h / eta_v);
    let te = ModePotential::new(&d, rho, gamma, zeta_h / zeta_v);
    let radial = Radial {
        x: d.x,
        y: d.y,
        rho,
    };
    let two_pi_gamma = 2.0 * PI * gamma;

    // Difference of the two modes' decays, the potential of the horizontal
    // electric source (`D`) and of the horizontal magnetic source (`F`).
    let electric_radial = || {
        let (um, um_p) = tm.decay(rho);
        let (ue, ue_p) = te.decay(rho);
        let dr = (um - ue) / (two_pi_gamma * rho);
        let drr = ((um_p - ue_p) / rho - (um - ue) / (rho * rho)) / two_pi_gamma;
        (dr, drr)
    };
    let magnetic_radial = || {
        let (um, _) = tm.decay(rho);
        let (ue, _) = te.decay(rho);
        let g = tm.tau * tm.anisotropy * um / tm.r - te.tau * te.anisotropy * ue / te.r;
        let slope = |p: &ModePotential, u: CScalar| {
            p.tau * p.anisotropy * u * rho * (-p.tau / (p.r * p.r) - (p.r * p.r * p.r).inv())
        };
        let g_p = slope(&tm, um) - slope(&te, ue);
        let scale = d.z / two_pi_gamma;
        (scale * g / rho, scale * (g_p / rho - g / (rho * rho)))
    };

    use Axis::{X, Y, Z};
    match (code.source.kind, code.receiver, code.source.axis) {
        (FieldKind::Electric, X, X) => {
            let (pr, prr) = electric_radial();
            0.5 * (tm.d2(0, 0) / eta_v - zeta_h * te.value + zeta_h * radial.xx(pr, prr))
        }
        (FieldKind::Electric, X, Y) | (FieldKind::Electric, Y, X) => {
            let (pr, prr) = electric_radial();
            0.5 * (tm.d2(0, 1) / eta_v + zeta_h * radial.xy(pr, prr))
        }
        (FieldKind::Electric, Y, Y) => {
            let (pr, prr) = electric_radial();
            0.5 * (tm.d2(1, 1) / eta_v - zeta_h * te.value + zeta_h * radial.yy(pr, prr))
        }
        (FieldKind::Electric, X, Z) | (FieldKind::Electric, Z, X) => tm.d2(0, 2) / (2.0 * eta_v),
        (FieldKind::Electric, Y, Z) | (FieldKind::Electric, Z, Y) => tm.d2(1, 2) / (2.0 * eta_v),
        (FieldKind::Electric, Z, Z) => {
            -eta_h / (2.0 * eta_v * eta_v) * (tm.d2(0, 0) + tm.d2(1, 1))
        }
        (FieldKind::Magnetic, X, X) => {
            let (pr, prr) = magnetic_radial();
            -0.5 * radial.xy(pr, prr)
        }
        (FieldKind::Magnetic, Y, Y) => {
            let (pr, prr) = magnetic_radial();
            0.5 * radial.xy(pr, prr)
        }
        (FieldKind::Magnetic, Y, X) => {
            let (pr, prr) = magnetic_radial();
            0.5 * (-te.d1(2) - radial.yy(pr, prr))
        }
        (FieldKind::Magnetic, X, Y) => {
            let (pr, prr) = magnetic_radial();
            0.5 * (te.d1(2) + radial.xx(pr, prr))
        }
        (FieldKind::Magnetic, Z, X) => eta_h / (2.0 * eta_v) * tm.d1(1),
        (FieldKind::Magnetic, Z, Y) => -eta_h / (2.0 * eta_v) * tm.d1(0),
        (FieldKind::Magnetic, X, Z) => -zeta_h / (2.0 * zeta_v) * te.d1(1),
        (FieldKind::Magnetic, Y, Z) => zeta_h / (2.0 * zeta_v) * te.d1(0),
        (FieldKind::Magnetic, Z, Z) => CScalar::new(0.0, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::constants::angular_frequency;
    use crate::materials::LayerMaterial;

    fn medium(res: Scalar, aniso: Scalar, hz: Scalar) -> LayerResponse {
        let mut layer = LayerMaterial::isotropic(res);
        layer.anisotropy = aniso;
        layer.response(angular_frequency(hz))
    }

    fn code(ab: u8) -> OrientationCode {
        OrientationCode::from_code(ab).expect("valid")
    }

    #[test]
    fn electric_field_is_symmetric_in_components() {
        let m = medium(10.0, 1.5, 1.0);
        let src = R3::new(0.0, 0.0, 0.0);
        let rec = R3::new(700.0, 400.0, -300.0);
        let e12 = fullspace(&src, &rec, &m, code(12));
        let e21 = fullspace(&src, &rec, &m, code(21));
        assert_relative_eq!(e12.re, e21.re, max_relative = 1.0e-14);
        let e13 = fullspace(&src, &rec, &m, code(13));
        let e31 = fullspace(&src, &rec, &m, code(31));
        assert_relative_eq!(e13.im, e31.im, max_relative = 1.0e-14);
    }

    #[test]
    fn static_isotropic_limit_matches_point_dipole() {
        // DC field of an x-directed current element in a conductor of
        // conductivity σ: E = (3 x̂·r̂ r̂ − x̂) / (4πσ r³).
        let mut layer = LayerMaterial::isotropic(4.0);
        layer.eperm_h = 0.0;
        layer.eperm_v = 0.0;
        let m = layer.response(angular_frequency(1.0e-12));
        let src = R3::new(0.0, 0.0, 0.0);
        let rec = R3::new(30.0, 40.0, 0.0);
        let r: Scalar = 50.0;
        let sigma = 0.25;
        let ex = fullspace(&src, &rec, &m, code(11));
        let expected = (3.0 * 0.36 - 1.0) / (4.0 * PI * sigma * r.powi(3));
        assert_relative_eq!(ex.re, expected, max_relative = 1.0e-6);
        let ey = fullspace(&src, &rec, &m, code(21));
        let expected = 3.0 * 0.6 * 0.8 / (4.0 * PI * sigma * r.powi(3));
        assert_relative_eq!(ey.re, expected, max_relative = 1.0e-6);
    }

    #[test]
    fn magnetic_pair_uses_dual_medium() {
        let m = medium(3.0, 2.0, 10.0);
        let src = R3::new(0.0, 0.0, 0.0);
        let rec = R3::new(-1000.0, 50.0, 300.0);
        let h55 = fullspace(&src, &rec, &m, code(55));
        let e22 = fullspace(&src, &rec, &m.dual(), code(22));
        assert_eq!(h55, e22);
    }

    #[test]
    fn magnetic_receiver_swaps_roles() {
        let m = medium(10.0, 1.5, 1.0);
        let src = R3::new(10.0, -20.0, 5.0);
        let rec = R3::new(10.0, 80.0, 65.0);
        let h41 = fullspace(&src, &rec, &m, code(41));
        let e14 = fullspace(&rec, &src, &m, code(14));
        assert_eq!(h41, -e14);
    }

    #[test]
    fn vertical_magnetic_dipole_has_no_vertical_electric_field() {
        let m = medium(10.0, 1.0, 100.0);
        let v = fullspace(&R3::zeros(), &R3::new(10.0, 10.0, 5.0), &m, code(36));
        assert_eq!(v, CScalar::new(0.0, 0.0));
    }
}
