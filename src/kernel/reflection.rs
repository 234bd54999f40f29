//! Per-mode propagation constants, characteristic impedances and generalized
//! reflection coefficients of the layer stack at one horizontal wavenumber.

use crate::materials::LayerResponse;
use crate::math::{CScalar, Scalar};

/// Polarisation of the equivalent transmission line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Transverse magnetic (vertical electric field present).
    Tm,
    /// Transverse electric (vertical magnetic field present).
    Te,
}

/// Thickness of the finite layer `i`, `0 < i < interfaces.len()`.
#[inline]
pub(crate) fn thickness(interfaces: &[Scalar], i: usize) -> Scalar {
    interfaces[i] - interfaces[i - 1]
}

/// One mode of the layer stack at a fixed wavenumber.
///
/// Reflection coefficients are accumulated with decaying exponentials only,
/// `e^{-2Γh}` with `Re Γ ≥ 0`, so they stay bounded for thick, thin and
/// strongly contrasting layers alike.
#[derive(Debug, Clone)]
pub struct ModalStack {
    /// Vertical propagation constant Γ per layer.
    pub gamma: Vec<CScalar>,
    /// Characteristic impedance per layer.
    pub impedance: Vec<CScalar>,
    /// Reflection at the bottom of each layer looking down; 0 in the last layer.
    pub down: Vec<CScalar>,
    /// Reflection at the top of each layer looking up; 0 in the first layer.
    pub up: Vec<CScalar>,
}

impl ModalStack {
    /// Builds the stack for `mode` at wavenumber `lambda`.
    ///
    /// `interfaces` holds the `responses.len() - 1` interface depths.
    #[must_use]
    pub fn new(
        mode: Mode,
        lambda: Scalar,
        responses: &[LayerResponse],
        interfaces: &[Scalar],
    ) -> Self {
        let n = responses.len();
        let lambda_sq = lambda * lambda;
        let (gamma, impedance): (Vec<CScalar>, Vec<CScalar>) = responses
            .iter()
            .map(|r| {
                let k_sq = r.wavenumber_sq();
                match mode {
                    Mode::Tm => {
                        let g = (r.eta_h / r.eta_v * lambda_sq + k_sq).sqrt();
                        (g, g / r.eta_h)
                    }
                    Mode::Te => {
                        let g = (r.zeta_h / r.zeta_v * lambda_sq + k_sq).sqrt();
                        (g, r.zeta_h / g)
                    }
                }
            })
            .unzip();

        let zero = CScalar::new(0.0, 0.0);
        let mut down = vec![zero; n];
        for i in (0..n.saturating_sub(1)).rev() {
            let local = (impedance[i + 1] - impedance[i]) / (impedance[i + 1] + impedance[i]);
            down[i] = if i + 1 == n - 1 {
                local
            } else {
                let below = down[i + 1]
                    * (-2.0 * gamma[i + 1] * thickness(interfaces, i + 1)).exp();
                (local + below) / (1.0 + local * below)
            };
        }

        let mut up = vec![zero; n];
        for i in 1..n {
            let local = (impedance[i - 1] - impedance[i]) / (impedance[i - 1] + impedance[i]);
            up[i] = if i - 1 == 0 {
                local
            } else {
                let above = up[i - 1] * (-2.0 * gamma[i - 1] * thickness(interfaces, i - 1)).exp();
                (local + above) / (1.0 + local * above)
            };
        }

        Self {
            gamma,
            impedance,
            down,
            up,
        }
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.gamma.len()
    }

    /// Whether the stack has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gamma.is_empty()
    }
}
