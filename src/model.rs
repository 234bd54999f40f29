//! Horizontally layered VTI earth model.

use log::warn;

use crate::constants::{angular_frequency, MIN_RESISTIVITY};
use crate::errors::StrataError;
use crate::materials::{LayerMaterial, LayerResponse};
use crate::math::{CScalar, Scalar};

/// Stack of horizontal layers separated by interfaces at increasing depth.
///
/// Layer `0` extends to z = −∞ and the last layer to z = +∞; `interfaces[i]` is
/// the boundary between layers `i` and `i + 1`. The z-axis points down.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredModel {
    interfaces: Vec<Scalar>,
    layers: Vec<LayerMaterial>,
}

impl LayeredModel {
    /// Isotropic model from interface depths and horizontal resistivities.
    ///
    /// `depth` may start with `-inf`, which is dropped; afterwards
    /// `depth.len() == resistivity.len() - 1` must hold.
    pub fn new(depth: &[Scalar], resistivity: &[Scalar]) -> Result<Self, StrataError> {
        let res: Vec<CScalar> = resistivity.iter().map(|&r| CScalar::new(r, 0.0)).collect();
        Self::with_complex_resistivity(depth, &res)
    }

    /// Homogeneous fullspace of the given resistivity.
    pub fn fullspace(resistivity: Scalar) -> Result<Self, StrataError> {
        Self::new(&[], &[resistivity])
    }

    /// Model with complex (dispersive) horizontal resistivities.
    pub fn with_complex_resistivity(
        depth: &[Scalar],
        resistivity: &[CScalar],
    ) -> Result<Self, StrataError> {
        let interfaces: Vec<Scalar> = match depth.first() {
            Some(&d) if d == Scalar::NEG_INFINITY => depth[1..].to_vec(),
            _ => depth.to_vec(),
        };
        if resistivity.is_empty() {
            return Err(StrataError::InvalidModel("at least one layer is required".into()));
        }
        if interfaces.len() + 1 != resistivity.len() {
            return Err(StrataError::InvalidModel(format!(
                "{} interfaces require {} resistivities, got {}",
                interfaces.len(),
                interfaces.len() + 1,
                resistivity.len()
            )));
        }
        if let Some(d) = interfaces.iter().find(|d| !d.is_finite()) {
            return Err(StrataError::InvalidModel(format!("interface depth {d} is not finite")));
        }
        if interfaces.windows(2).any(|w| w[1] <= w[0]) {
            return Err(StrataError::InvalidModel(
                "interface depths must be strictly increasing".into(),
            ));
        }

        let layers = resistivity
            .iter()
            .enumerate()
            .map(|(i, &res)| {
                if !(res.re.is_finite() && res.im.is_finite()) {
                    return Err(StrataError::InvalidModel(format!(
                        "resistivity of layer {i} is not finite"
                    )));
                }
                if res.re < 0.0 {
                    return Err(StrataError::InvalidModel(format!(
                        "resistivity of layer {i} is negative ({})",
                        res.re
                    )));
                }
                let res = if res.norm() < MIN_RESISTIVITY {
                    warn!("resistivity of layer {i} clamped to {MIN_RESISTIVITY:e} Ohm.m");
                    CScalar::new(MIN_RESISTIVITY, 0.0)
                } else {
                    res
                };
                let mut layer = LayerMaterial::isotropic(1.0);
                layer.resistivity = res;
                Ok(layer)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { interfaces, layers })
    }

    /// Sets the anisotropy √(ρ_v/ρ_h), one value for all layers or one per layer.
    pub fn with_anisotropy(mut self, values: &[Scalar]) -> Result<Self, StrataError> {
        let values = self.broadcast("anisotropy", values, |v| v > 0.0)?;
        self.layers.iter_mut().zip(values).for_each(|(l, v)| l.anisotropy = v);
        Ok(self)
    }

    /// Sets the horizontal relative electric permittivity.
    pub fn with_eperm_h(mut self, values: &[Scalar]) -> Result<Self, StrataError> {
        let values = self.broadcast("epermH", values, |v| v >= 0.0)?;
        self.layers.iter_mut().zip(values).for_each(|(l, v)| l.eperm_h = v);
        Ok(self)
    }

    /// Sets the vertical relative electric permittivity.
    pub fn with_eperm_v(mut self, values: &[Scalar]) -> Result<Self, StrataError> {
        let values = self.broadcast("epermV", values, |v| v >= 0.0)?;
        self.layers.iter_mut().zip(values).for_each(|(l, v)| l.eperm_v = v);
        Ok(self)
    }

    /// Sets the horizontal relative magnetic permeability.
    pub fn with_mperm_h(mut self, values: &[Scalar]) -> Result<Self, StrataError> {
        let values = self.broadcast("mpermH", values, |v| v > 0.0)?;
        self.layers.iter_mut().zip(values).for_each(|(l, v)| l.mperm_h = v);
        Ok(self)
    }

    /// Sets the vertical relative magnetic permeability.
    pub fn with_mperm_v(mut self, values: &[Scalar]) -> Result<Self, StrataError> {
        let values = self.broadcast("mpermV", values, |v| v > 0.0)?;
        self.layers.iter_mut().zip(values).for_each(|(l, v)| l.mperm_v = v);
        Ok(self)
    }

    fn broadcast(
        &self,
        name: &str,
        values: &[Scalar],
        admissible: impl Fn(Scalar) -> bool,
    ) -> Result<Vec<Scalar>, StrataError> {
        let n = self.layers.len();
        let values = match values.len() {
            1 => vec![values[0]; n],
            len if len == n => values.to_vec(),
            len => {
                return Err(StrataError::InvalidModel(format!(
                    "{name} needs 1 or {n} values, got {len}"
                )))
            }
        };
        match values.iter().position(|&v| !(v.is_finite() && admissible(v))) {
            Some(i) => Err(StrataError::InvalidModel(format!(
                "{name} of layer {i} is out of range ({})",
                values[i]
            ))),
            None => Ok(values),
        }
    }

    /// Number of layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Interface depths, excluding the implicit −∞.
    #[must_use]
    pub fn interfaces(&self) -> &[Scalar] {
        &self.interfaces
    }

    /// Layer materials from top to bottom.
    #[must_use]
    pub fn layers(&self) -> &[LayerMaterial] {
        &self.layers
    }

    /// Index of the layer containing depth `z`; a point exactly on an
    /// interface belongs to the layer above it.
    #[must_use]
    pub fn layer_index(&self, z: Scalar) -> usize {
        layer_containing(&self.interfaces, z)
    }

    /// Per-layer admittivities and impedivities at frequency `hz`.
    #[must_use]
    pub fn responses(&self, hz: Scalar) -> Vec<LayerResponse> {
        let omega = angular_frequency(hz);
        self.layers.iter().map(|l| l.response(omega)).collect()
    }
}

/// Layer holding depth `z` given the interface depths; interfaces belong to
/// the layer above.
pub(crate) fn layer_containing(interfaces: &[Scalar], z: Scalar) -> usize {
    interfaces.iter().take_while(|&&d| d < z).count()
}
