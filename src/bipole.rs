//! Finite-length sources and receivers and their point-dipole integration.
//!
//! A pole is a straight line segment carrying a uniform current (source) or
//! averaging the field along it (receiver). It is discretised with a
//! Gauss–Legendre rule whose weights sum to one, so the result is the mean of
//! the point-dipole responses over both segments.

use std::borrow::Cow;

use crate::errors::{PrecisionWarning, StrataError};
use crate::kernel::{angular_factors, LayeredKernel, Placement};
use crate::materials::LayerResponse;
use crate::math::{direction_cosines, offset_and_angle, CScalar, Scalar, R3};
use crate::model::LayeredModel;
use crate::orientation::{resolve, Duality, ElementaryCode, FieldKind};
use crate::reference::fullspace::elementary;
use crate::simulation::SimulationConfig;
use crate::transform::hankel::hankel;
use crate::transform::quadrature::gauss_legendre;

/// Electric or magnetic source or receiver element.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pole {
    /// Midpoint of the element (m, z down).
    pub center: R3,
    /// Horizontal angle from x towards y, in degrees.
    pub azimuth: Scalar,
    /// Angle below the horizontal, in degrees.
    pub dip: Scalar,
    /// Length in meters; zero for a point dipole.
    pub length: Scalar,
    /// Gauss–Legendre points along the element.
    pub points: usize,
    /// Electric current element or magnetic dipole.
    pub kind: FieldKind,
}

impl Pole {
    /// Electric point dipole.
    #[must_use]
    pub const fn dipole(center: R3, azimuth: Scalar, dip: Scalar) -> Self {
        Self {
            center,
            azimuth,
            dip,
            length: 0.0,
            points: 1,
            kind: FieldKind::Electric,
        }
    }

    /// Electric bipole between the end points `a` and `b`, evaluated at its
    /// midpoint until [`Pole::with_points`] asks for more.
    #[must_use]
    pub fn from_endpoints(a: R3, b: R3) -> Self {
        let d = b - a;
        let length = d.norm();
        let (azimuth, dip) = if length > 0.0 {
            (
                d.y.atan2(d.x).to_degrees(),
                (d.z / length).clamp(-1.0, 1.0).asin().to_degrees(),
            )
        } else {
            (0.0, 0.0)
        };
        Self {
            center: (a + b) * 0.5,
            azimuth,
            dip,
            length,
            points: 1,
            kind: FieldKind::Electric,
        }
    }

    /// Number of Gauss–Legendre points along the element.
    #[must_use]
    pub const fn with_points(mut self, points: usize) -> Self {
        self.points = points;
        self
    }

    /// Sets the length (m) about the unchanged centre.
    #[must_use]
    pub const fn with_length(mut self, length: Scalar) -> Self {
        self.length = length;
        self
    }

    /// Turns the element into a magnetic one.
    #[must_use]
    pub const fn magnetic(mut self) -> Self {
        self.kind = FieldKind::Magnetic;
        self
    }

    /// Unit vector along the element.
    #[must_use]
    pub fn direction(&self) -> R3 {
        direction_cosines(self.azimuth, self.dip)
    }

    /// Integration points and their weights (summing to one).
    #[must_use]
    pub fn quadrature(&self) -> Vec<(R3, Scalar)> {
        if self.length == 0.0 || self.points <= 1 {
            return vec![(self.center, 1.0)];
        }
        let half = 0.5 * self.length * self.direction();
        let (nodes, weights) = gauss_legendre(self.points);
        nodes
            .into_iter()
            .zip(weights)
            .map(|(x, w)| (self.center + half * x, 0.5 * w))
            .collect()
    }

    /// Length entering the `strength` scaling; point dipoles count as 1 m.
    pub(crate) fn scale_length(&self) -> Scalar {
        if self.length > 0.0 {
            self.length
        } else {
            1.0
        }
    }

    pub(crate) fn validate(&self, role: &str) -> Result<(), StrataError> {
        if !self.center.iter().all(|c| c.is_finite()) {
            return Err(StrataError::InvalidSurvey(format!(
                "{role} position must be finite, got {:?}",
                self.center
            )));
        }
        if !(self.azimuth.is_finite() && self.dip.is_finite()) {
            return Err(StrataError::InvalidOrientation(format!(
                "{role} azimuth and dip must be finite, got ({}, {})",
                self.azimuth, self.dip
            )));
        }
        if !(self.length.is_finite() && self.length >= 0.0) {
            return Err(StrataError::InvalidSurvey(format!(
                "{role} length must be finite and non-negative, got {}",
                self.length
            )));
        }
        if self.points == 0 {
            return Err(StrataError::InvalidSurvey(format!(
                "{role} needs at least one integration point"
            )));
        }
        Ok(())
    }
}

/// Source and receiver of one elementary evaluation after applying the
/// duality: the field at `to` due to a dipole at `from`, times `sign`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PointPair {
    pub from: R3,
    pub to: R3,
    pub offset: Scalar,
    pub angle: Scalar,
    pub sign: Scalar,
}

impl PointPair {
    /// Horizontal offsets below `min_offset` are raised to it at zero angle.
    pub(crate) fn new(source: &R3, receiver: &R3, duality: Duality, min_offset: Scalar) -> Self {
        let (from, to, sign) = match duality {
            Duality::Reciprocal => (*receiver, *source, -1.0),
            Duality::Direct | Duality::DualMedium => (*source, *receiver, 1.0),
        };
        let (offset, angle) = offset_and_angle(&from, &to);
        let (offset, angle) = if offset < min_offset {
            (min_offset, 0.0)
        } else {
            (offset, angle)
        };
        Self {
            from,
            to,
            offset,
            angle,
            sign,
        }
    }

    pub(crate) fn placement<'a>(&self, interfaces: &'a [Scalar]) -> Placement<'a> {
        Placement::new(interfaces, self.from.z, self.to.z)
    }

    /// Separation vector with the possibly clamped horizontal offset.
    fn separation(&self) -> R3 {
        let (s, c) = self.angle.sin_cos();
        R3::new(self.offset * c, self.offset * s, self.to.z - self.from.z)
    }
}

/// Per-layer media seen by the kernel: the dual medium for magnetic pairs.
pub(crate) fn media(responses: &[LayerResponse], duality: Duality) -> Cow<'_, [LayerResponse]> {
    match duality {
        Duality::DualMedium => Cow::Owned(responses.iter().map(|r| r.dual()).collect()),
        Duality::Direct | Duality::Reciprocal => Cow::Borrowed(responses),
    }
}

/// Elementary component `code` for one point pair at one frequency.
fn point_response(
    pair: &PointPair,
    code: ElementaryCode,
    model: &LayeredModel,
    media: &[LayerResponse],
    config: &SimulationConfig,
) -> (CScalar, Option<PrecisionWarning>) {
    let placement = pair.placement(model.interfaces());
    let split_direct = config.xdirect && placement.same_layer();
    let kernel = LayeredKernel::new(media, placement, code, !split_direct);
    let factors = angular_factors(code, pair.angle, pair.offset);
    let (mut value, warning) = hankel(
        |lambda| kernel.evaluate(lambda),
        pair.offset,
        &factors,
        &config.hankel,
    );
    if split_direct {
        value += elementary(&pair.separation(), &media[placement.source_layer], code);
    }
    (value * pair.sign, warning)
}

/// Wavenumber-domain integrands between the centres of two poles with the
/// angular factors applied, `(J0 term, J1 term)` for each of `lambdas`.
pub(crate) fn point_spectrum(
    source: &Pole,
    receiver: &Pole,
    model: &LayeredModel,
    responses: &[LayerResponse],
    lambdas: &[Scalar],
    min_offset: Scalar,
) -> Vec<(CScalar, CScalar)> {
    let resolution = resolve(
        source.kind,
        &source.direction(),
        receiver.kind,
        &receiver.direction(),
    );
    let media = media(responses, resolution.duality);
    let pair = PointPair::new(&source.center, &receiver.center, resolution.duality, min_offset);
    let placement = pair.placement(model.interfaces());
    let mut out = vec![(CScalar::new(0.0, 0.0), CScalar::new(0.0, 0.0)); lambdas.len()];
    for &(code, weight) in &resolution.terms {
        let kernel = LayeredKernel::new(&media, placement, code, true);
        let factors = angular_factors(code, pair.angle, pair.offset);
        for (slot, &lambda) in out.iter_mut().zip(lambdas) {
            let (w0, w1) = kernel.evaluate(lambda).weighted(&factors);
            slot.0 += w0 * weight * pair.sign;
            slot.1 += w1 * weight * pair.sign;
        }
    }
    out
}

/// Response of `receiver` to `source` at one frequency, given the per-layer
/// responses of `model` at that frequency.
pub(crate) fn pole_pair(
    source: &Pole,
    receiver: &Pole,
    model: &LayeredModel,
    responses: &[LayerResponse],
    config: &SimulationConfig,
) -> (CScalar, Vec<PrecisionWarning>) {
    let resolution = resolve(
        source.kind,
        &source.direction(),
        receiver.kind,
        &receiver.direction(),
    );
    let media = media(responses, resolution.duality);
    let source_points = source.quadrature();
    let receiver_points = receiver.quadrature();

    let mut total = CScalar::new(0.0, 0.0);
    let mut warnings = Vec::new();
    for (ps, ws) in &source_points {
        for (pr, wr) in &receiver_points {
            let pair = PointPair::new(ps, pr, resolution.duality, config.min_offset);
            for &(code, weight) in &resolution.terms {
                let (value, warning) = point_response(&pair, code, model, &media, config);
                total += value * (weight * ws * wr);
                warnings.extend(warning);
            }
        }
    }
    if config.strength > 0.0 {
        total *= config.strength * source.scale_length() * receiver.scale_length();
    }
    (total, warnings)
}

/// Number of integration point pairs closer horizontally than `min_offset`.
pub(crate) fn clamped_pairs(source: &Pole, receiver: &Pole, min_offset: Scalar) -> usize {
    let receiver_points = receiver.quadrature();
    source
        .quadrature()
        .iter()
        .map(|(ps, _)| {
            receiver_points
                .iter()
                .filter(|(pr, _)| offset_and_angle(ps, pr).0 < min_offset)
                .count()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn endpoints_define_center_length_and_angles() {
        let pole = Pole::from_endpoints(R3::new(0.0, 0.0, 100.0), R3::new(0.0, 200.0, 100.0));
        assert_relative_eq!(pole.length, 200.0);
        assert_relative_eq!(pole.azimuth, 90.0, epsilon = 1.0e-12);
        assert_relative_eq!(pole.dip, 0.0);
        assert_eq!(pole.center, R3::new(0.0, 100.0, 100.0));

        let steep = Pole::from_endpoints(R3::new(0.0, 0.0, 0.0), R3::new(0.0, 0.0, 50.0));
        assert_relative_eq!(steep.dip, 90.0, epsilon = 1.0e-12);
    }

    #[test]
    fn quadrature_weights_sum_to_one_along_the_segment() {
        let pole = Pole::from_endpoints(R3::new(-50.0, 0.0, 10.0), R3::new(50.0, 0.0, 10.0))
            .with_points(5);
        let points = pole.quadrature();
        assert_eq!(points.len(), 5);
        let total: Scalar = points.iter().map(|(_, w)| w).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1.0e-14);
        assert!(points.iter().all(|(p, _)| p.x.abs() < 50.0 && p.z == 10.0));
        let mean_x: Scalar = points.iter().map(|(p, w)| p.x * w).sum();
        assert_relative_eq!(mean_x, 0.0, epsilon = 1.0e-12);
    }

    #[test]
    fn point_dipole_ignores_point_count() {
        let pole = Pole::dipole(R3::new(1.0, 2.0, 3.0), 30.0, 10.0).with_points(7);
        assert_eq!(pole.quadrature(), vec![(R3::new(1.0, 2.0, 3.0), 1.0)]);
    }

    #[test]
    fn invalid_poles_are_rejected() {
        let pole = Pole::dipole(R3::new(0.0, 0.0, 0.0), 0.0, 0.0);
        assert!(pole.with_points(0).validate("source").is_err());
        assert!(pole.with_length(-1.0).validate("source").is_err());
        assert!(Pole::dipole(R3::new(Scalar::NAN, 0.0, 0.0), 0.0, 0.0)
            .validate("receiver")
            .is_err());
        assert!(pole.validate("source").is_ok());
    }

    #[test]
    fn reciprocal_pairs_swap_positions_and_clamp_offsets() {
        let s = R3::new(0.0, 0.0, 10.0);
        let r = R3::new(0.0, 0.0, 50.0);
        let pair = PointPair::new(&s, &r, Duality::Reciprocal, 1.0e-3);
        assert_eq!(pair.from, r);
        assert_eq!(pair.to, s);
        assert_eq!(pair.sign, -1.0);
        assert_eq!(pair.offset, 1.0e-3);
        assert_eq!(pair.angle, 0.0);
        assert_eq!(
            clamped_pairs(&Pole::dipole(s, 0.0, 0.0), &Pole::dipole(r, 0.0, 0.0), 1.0e-3),
            1
        );
    }
}
