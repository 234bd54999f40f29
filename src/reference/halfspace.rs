//! Diffusive fields of electric dipoles in a VTI halfspace below air.

use std::f64::consts::PI;

use crate::constants::{angular_frequency, MIN_OFFSET};
use crate::errors::StrataError;
use crate::materials::LayerMaterial;
use crate::math::{offset_and_angle, CScalar, Scalar, R3};
use crate::orientation::{Axis, FieldKind, OrientationCode};
use crate::reference::fullspace::elementary;
use crate::transform::quadrature::Panel;
use crate::transform::special::{bessel_j0, bessel_j1};

/// Gauss–Legendre points per wavenumber panel.
const PANEL_POINTS: usize = 16;
/// Upper wavenumber limit in units of the slowest decay rate `1/(z + z')`.
const DECAY_LENGTHS: Scalar = 40.0;

/// Field of electric component `ab` at `receiver` for a unit dipole at
/// `source`, both strictly below the surface `z = 0` of a halfspace with
/// horizontal `resistivity` and `anisotropy`, in the quasi-static regime
/// (no displacement currents, insulating air).
///
/// The direct wave is the closed-form fullspace field; the surface
/// reflection is integrated over wavenumber with fixed Gauss–Legendre panels.
pub fn halfspace(
    source: &R3,
    receiver: &R3,
    resistivity: Scalar,
    anisotropy: Scalar,
    frequency: Scalar,
    ab: OrientationCode,
) -> Result<CScalar, StrataError> {
    if ab.source.kind != FieldKind::Electric || ab.receiver.kind != FieldKind::Electric {
        return Err(StrataError::InvalidOrientation(format!(
            "halfspace reference supports electric codes only, got {ab}"
        )));
    }
    if !(source.z > 0.0 && receiver.z > 0.0) {
        return Err(StrataError::InvalidSurvey(
            "halfspace source and receiver must lie below z = 0".into(),
        ));
    }
    if !(resistivity > 0.0 && anisotropy > 0.0 && frequency > 0.0) {
        return Err(StrataError::InvalidModel(
            "halfspace resistivity, anisotropy and frequency must be positive".into(),
        ));
    }

    let mut earth = LayerMaterial::isotropic(resistivity);
    earth.anisotropy = anisotropy;
    earth.eperm_h = 0.0;
    earth.eperm_v = 0.0;
    let medium = earth.response(angular_frequency(frequency));
    let (code, _) = ab.reduce();
    let direct = elementary(&(receiver - source), &medium, code);

    let (offset, angle) = offset_and_angle(source, receiver);
    let (rho, angle) = if offset < MIN_OFFSET {
        (MIN_OFFSET, 0.0)
    } else {
        (offset, angle)
    };
    let (s, c) = angle.sin_cos();
    let (s2, c2) = (2.0 * angle).sin_cos();
    use Axis::{X, Y, Z};
    // Angular factors of the J0, J1 and second J0 terms.
    let (fa, fb, fc) = match (ab.receiver.axis, ab.source.axis) {
        (X, X) => (1.0, c2 / rho, c2),
        (X, Y) | (Y, X) => (0.0, s2 / rho, s2),
        (Y, Y) => (1.0, -c2 / rho, -c2),
        (Z, X) | (X, Z) => (0.0, c, 0.0),
        (Z, Y) | (Y, Z) => (0.0, s, 0.0),
        (Z, Z) => (1.0, 0.0, 0.0),
    };

    let (eta_h, eta_v, zeta_h) = (medium.eta_h, medium.eta_v, medium.zeta_h);
    let ratio = eta_h / eta_v;
    let k_sq = medium.wavenumber_sq();
    let depth = source.z + receiver.z;
    let kernel = |l: Scalar| -> (CScalar, CScalar, CScalar) {
        let g_tm = (ratio * l * l + k_sq).sqrt();
        let g_te = (l * l + k_sq).sqrt();
        let z_tm = g_tm / eta_h;
        let z_te = zeta_h / g_te;
        // The insulating surface reflects TM fully and TE as (Γ − λ)/(Γ + λ).
        let r_te = (g_te - l) / (g_te + l);
        let e_tm = (-g_tm * depth).exp();
        let e_te = (-g_te * depth).exp();
        let shunt_v_tm = z_tm * 0.5 * e_tm;
        let shunt_v_te = r_te * z_te * 0.5 * e_te;
        let shunt_i_tm = 0.5 * e_tm;
        let series_v_tm = -0.5 * e_tm;
        let series_i_tm = -e_tm / (2.0 * z_tm);
        let zero = CScalar::new(0.0, 0.0);
        match (ab.receiver.axis, ab.source.axis) {
            (Z, Z) => (l * l * l * series_i_tm / (eta_v * eta_v), zero, zero),
            (Z, _) => (zero, l * l * shunt_i_tm / eta_v, zero),
            (_, Z) => (zero, l * l * series_v_tm / eta_v, zero),
            _ => (
                -l * (shunt_v_tm + shunt_v_te) * 0.5,
                shunt_v_tm - shunt_v_te,
                -l * (shunt_v_tm - shunt_v_te) * 0.5,
            ),
        }
    };

    let panel = Panel::new(PANEL_POINTS);
    let lambda_max = DECAY_LENGTHS / (ratio.re.min(1.0).sqrt() * depth);
    let width = (PI / rho).min(1.0 / depth);
    let mut reflected = CScalar::new(0.0, 0.0);
    let mut a = 0.0;
    while a < lambda_max {
        let b = a + width;
        let samples: Vec<CScalar> = panel
            .abscissae(a, b)
            .into_iter()
            .map(|l| {
                let (ka, kb, kc) = kernel(l);
                (ka * fa + kc * fc) * bessel_j0(l * rho) + kb * fb * bessel_j1(l * rho)
            })
            .collect();
        reflected += panel.integrate(a, b, &samples);
        a = b;
    }
    Ok(direct + reflected / (2.0 * PI))
}
