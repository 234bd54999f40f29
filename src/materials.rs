//! Per-layer material parameters of a vertically transverse-isotropic medium.

use crate::constants::{VACUUM_PERMEABILITY, VACUUM_PERMITTIVITY};
use crate::math::{CScalar, Scalar, I};

/// Electrical and magnetic parameters of one VTI layer, relative to vacuum.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerMaterial {
    /// Horizontal resistivity ρ_h in Ω·m (real, or complex for dispersive layers).
    pub resistivity: CScalar,
    /// Anisotropy λ = √(ρ_v / ρ_h).
    pub anisotropy: Scalar,
    /// Horizontal relative electric permittivity.
    pub eperm_h: Scalar,
    /// Vertical relative electric permittivity.
    pub eperm_v: Scalar,
    /// Horizontal relative magnetic permeability.
    pub mperm_h: Scalar,
    /// Vertical relative magnetic permeability.
    pub mperm_v: Scalar,
}

impl LayerMaterial {
    /// Isotropic, non-magnetic layer with vacuum permittivity.
    #[must_use]
    pub fn isotropic(resistivity: Scalar) -> Self {
        Self {
            resistivity: CScalar::new(resistivity, 0.0),
            anisotropy: 1.0,
            eperm_h: 1.0,
            eperm_v: 1.0,
            mperm_h: 1.0,
            mperm_v: 1.0,
        }
    }

    /// Admittivities and impedivities at angular frequency `omega` (rad/s).
    #[must_use]
    pub fn response(&self, omega: Scalar) -> LayerResponse {
        let iw = I * omega;
        let sigma_h = self.resistivity.inv();
        let sigma_v = (self.resistivity * self.anisotropy * self.anisotropy).inv();
        LayerResponse {
            eta_h: sigma_h + iw * self.eperm_h * VACUUM_PERMITTIVITY,
            eta_v: sigma_v + iw * self.eperm_v * VACUUM_PERMITTIVITY,
            zeta_h: iw * self.mperm_h * VACUUM_PERMEABILITY,
            zeta_v: iw * self.mperm_v * VACUUM_PERMEABILITY,
        }
    }
}

/// Complex admittivity η = σ + iωε and impedivity ζ = iωμ of a layer at one
/// frequency (time dependence `e^{iωt}`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerResponse {
    /// Horizontal admittivity η_h (S/m).
    pub eta_h: CScalar,
    /// Vertical admittivity η_v (S/m).
    pub eta_v: CScalar,
    /// Horizontal impedivity ζ_h (Ω/m).
    pub zeta_h: CScalar,
    /// Vertical impedivity ζ_v (Ω/m).
    pub zeta_v: CScalar,
}

impl LayerResponse {
    /// Electric/magnetic dual medium (η ↔ ζ), used to map magnetic source and
    /// receiver pairs onto electric ones.
    #[must_use]
    pub fn dual(self) -> Self {
        Self {
            eta_h: self.zeta_h,
            eta_v: self.zeta_v,
            zeta_h: self.eta_h,
            zeta_v: self.eta_v,
        }
    }

    /// Squared isotropic wavenumber η_h ζ_h.
    #[must_use]
    pub fn wavenumber_sq(&self) -> CScalar {
        self.eta_h * self.zeta_h
    }
}
