//! Source/receiver orientation codes and their reduction onto the elementary
//! components the layered kernel evaluates.
//!
//! A two-digit code `ab` carries the receiver in the tens digit and the source
//! in the units digit. Digits 1–3 are electric x, y, z and digits 4–6 magnetic
//! x, y, z. Configurations with a magnetic receiver are mapped onto electric
//! receivers by electromagnetic duality, so the kernel only ever sees an
//! electric receiver driven by an electric or magnetic source.

use std::fmt;

use crate::errors::StrataError;
use crate::math::{Scalar, R3};

/// Electric or magnetic character of a source or receiver.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Electric current element or electric field.
    Electric,
    /// Magnetic dipole or magnetic field.
    Magnetic,
}

/// Cartesian axis (x east, y north, z down).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal, towards azimuth 0.
    X,
    /// Horizontal, towards azimuth 90°.
    Y,
    /// Vertical, positive down.
    Z,
}

impl Axis {
    /// The three axes in index order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Component index into an `R3`.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Azimuth and dip (degrees) of the unit vector along this axis.
    #[must_use]
    pub const fn angles(self) -> (Scalar, Scalar) {
        match self {
            Self::X => (0.0, 0.0),
            Self::Y => (90.0, 0.0),
            Self::Z => (0.0, 90.0),
        }
    }
}

/// One digit of an orientation code.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Component {
    /// Electric or magnetic.
    pub kind: FieldKind,
    /// Direction of the element.
    pub axis: Axis,
}

impl Component {
    /// Electric component along `axis`.
    #[must_use]
    pub const fn electric(axis: Axis) -> Self {
        Self {
            kind: FieldKind::Electric,
            axis,
        }
    }

    /// Magnetic component along `axis`.
    #[must_use]
    pub const fn magnetic(axis: Axis) -> Self {
        Self {
            kind: FieldKind::Magnetic,
            axis,
        }
    }

    /// Decodes a digit in `1..=6`.
    pub fn from_digit(digit: u8) -> Result<Self, StrataError> {
        let axis = match digit {
            1 | 4 => Axis::X,
            2 | 5 => Axis::Y,
            3 | 6 => Axis::Z,
            other => {
                return Err(StrataError::InvalidOrientation(format!(
                    "orientation digit {other} is outside 1..=6"
                )))
            }
        };
        let kind = if digit > 3 {
            FieldKind::Magnetic
        } else {
            FieldKind::Electric
        };
        Ok(Self { kind, axis })
    }

    /// Digit in `1..=6` encoding this component.
    #[must_use]
    pub const fn digit(self) -> u8 {
        let base = match self.kind {
            FieldKind::Electric => 1,
            FieldKind::Magnetic => 4,
        };
        base + self.axis.index() as u8
    }
}

/// Receiver and source components of a simulation, the `ab` code.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrientationCode {
    /// Tens digit.
    pub receiver: Component,
    /// Units digit.
    pub source: Component,
}

impl OrientationCode {
    /// Code from its receiver and source components.
    #[must_use]
    pub const fn new(receiver: Component, source: Component) -> Self {
        Self { receiver, source }
    }

    /// Parses a code in `11..=66` whose digits are both in `1..=6`.
    pub fn from_code(ab: u8) -> Result<Self, StrataError> {
        if !(11..=66).contains(&ab) {
            return Err(StrataError::InvalidOrientation(format!(
                "orientation code {ab} is outside 11..=66"
            )));
        }
        let receiver = Component::from_digit(ab / 10)
            .map_err(|_| StrataError::InvalidOrientation(format!("invalid orientation code {ab}")))?;
        let source = Component::from_digit(ab % 10)
            .map_err(|_| StrataError::InvalidOrientation(format!("invalid orientation code {ab}")))?;
        Ok(Self { receiver, source })
    }

    /// Two-digit numeric form.
    #[must_use]
    pub const fn code(self) -> u8 {
        10 * self.receiver.digit() + self.source.digit()
    }

    /// Elementary component and the duality mapping this code onto it.
    #[must_use]
    pub const fn reduce(self) -> (ElementaryCode, Duality) {
        match (self.receiver.kind, self.source.kind) {
            (FieldKind::Electric, _) => (
                ElementaryCode {
                    receiver: self.receiver.axis,
                    source: self.source,
                },
                Duality::Direct,
            ),
            (FieldKind::Magnetic, FieldKind::Magnetic) => (
                ElementaryCode {
                    receiver: self.receiver.axis,
                    source: Component::electric(self.source.axis),
                },
                Duality::DualMedium,
            ),
            (FieldKind::Magnetic, FieldKind::Electric) => (
                ElementaryCode {
                    receiver: self.source.axis,
                    source: Component::magnetic(self.receiver.axis),
                },
                Duality::Reciprocal,
            ),
        }
    }

    /// Resolution of an axis-aligned source/receiver pair: a single term of
    /// unit weight.
    #[must_use]
    pub fn resolve(self) -> Resolution {
        let (code, duality) = self.reduce();
        Resolution {
            duality,
            terms: vec![(code, 1.0)],
        }
    }
}

impl TryFrom<u8> for OrientationCode {
    type Error = StrataError;

    fn try_from(ab: u8) -> Result<Self, Self::Error> {
        Self::from_code(ab)
    }
}

impl fmt::Display for OrientationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Configuration evaluated by the kernel: an electric receiver along
/// `receiver` driven by an electric or magnetic `source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementaryCode {
    /// Axis of the electric receiver.
    pub receiver: Axis,
    /// Source component.
    pub source: Component,
}

impl ElementaryCode {
    /// Two-digit numeric form.
    #[must_use]
    pub const fn code(self) -> u8 {
        10 * (self.receiver.index() as u8 + 1) + self.source.digit()
    }
}

/// How an [`ElementaryCode`] evaluation maps back onto the requested code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Duality {
    /// Evaluated as requested.
    Direct,
    /// Magnetic source and receiver: the electric pair in the dual medium
    /// (η ↔ ζ).
    DualMedium,
    /// Magnetic receiver of an electric source: source and receiver swap
    /// positions and roles, and the sign flips.
    Reciprocal,
}

/// Weighted elementary components making up one source/receiver pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Reduction applied before the kernel sees the terms.
    pub duality: Duality,
    /// Elementary codes with their projection weights.
    pub terms: Vec<(ElementaryCode, Scalar)>,
}

/// Projects arbitrarily oriented source and receiver directions onto the
/// axis-aligned elementary components, skipping components with zero
/// direction cosine.
#[must_use]
pub fn resolve(
    source: FieldKind,
    source_direction: &R3,
    receiver: FieldKind,
    receiver_direction: &R3,
) -> Resolution {
    let duality = OrientationCode::new(
        Component {
            kind: receiver,
            axis: Axis::X,
        },
        Component {
            kind: source,
            axis: Axis::X,
        },
    )
    .reduce()
    .1;
    let terms = Axis::ALL
        .iter()
        .filter(|s| source_direction[s.index()] != 0.0)
        .flat_map(|&s| {
            Axis::ALL
                .iter()
                .filter(|r| receiver_direction[r.index()] != 0.0)
                .map(move |&r| {
                    let code = OrientationCode::new(
                        Component { kind: receiver, axis: r },
                        Component { kind: source, axis: s },
                    );
                    (
                        code.reduce().0,
                        source_direction[s.index()] * receiver_direction[r.index()],
                    )
                })
        })
        .collect();
    Resolution { duality, terms }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::direction_cosines;

    #[test]
    fn every_valid_code_round_trips() {
        for r in 1..=6u8 {
            for s in 1..=6u8 {
                let ab = 10 * r + s;
                let code = OrientationCode::from_code(ab).expect("valid code");
                assert_eq!(code.code(), ab);
            }
        }
    }

    #[test]
    fn invalid_codes_are_rejected() {
        for ab in [0u8, 10, 17, 20, 47, 67, 70, 99] {
            let err = OrientationCode::try_from(ab).unwrap_err();
            assert!(matches!(err, StrataError::InvalidOrientation(_)), "{ab}");
        }
    }

    #[test]
    fn magnetic_pairs_reduce_by_thirty_three() {
        let (code, duality) = OrientationCode::from_code(55).expect("valid").reduce();
        assert_eq!(code.code(), 22);
        assert_eq!(duality, Duality::DualMedium);
        let (code, duality) = OrientationCode::from_code(46).expect("valid").reduce();
        assert_eq!(code.code(), 13);
        assert_eq!(duality, Duality::DualMedium);
    }

    #[test]
    fn magnetic_receivers_swap_digits() {
        let (code, duality) = OrientationCode::from_code(41).expect("valid").reduce();
        assert_eq!(code.code(), 14);
        assert_eq!(duality, Duality::Reciprocal);
        let (code, _) = OrientationCode::from_code(63).expect("valid").reduce();
        assert_eq!(code.code(), 36);
    }

    #[test]
    fn electric_receivers_pass_through() {
        for ab in [11u8, 23, 26, 35] {
            let (code, duality) = OrientationCode::from_code(ab).expect("valid").reduce();
            assert_eq!(code.code(), ab);
            assert_eq!(duality, Duality::Direct);
        }
    }

    #[test]
    fn oblique_source_projects_onto_axes() {
        let src = direction_cosines(45.0, 0.0);
        let rec = direction_cosines(0.0, 90.0);
        let res = resolve(FieldKind::Electric, &src, FieldKind::Electric, &rec);
        assert_eq!(res.duality, Duality::Direct);
        assert_eq!(res.terms.len(), 2);
        assert_eq!(res.terms[0].0.code(), 31);
        assert_eq!(res.terms[1].0.code(), 32);
        for (_, w) in &res.terms {
            assert_relative_eq!(*w, 0.5_f64.sqrt(), epsilon = 1.0e-14);
        }
    }

    #[test]
    fn arbitrary_orientation_yields_at_most_nine_terms() {
        let src = direction_cosines(20.0, 30.0);
        let rec = direction_cosines(-70.0, 10.0);
        let res = resolve(FieldKind::Magnetic, &src, FieldKind::Electric, &rec);
        assert_eq!(res.terms.len(), 9);
        let total: f64 = res.terms.iter().map(|(_, w)| w).sum();
        assert_relative_eq!(total, src.sum() * rec.sum(), epsilon = 1.0e-12);
    }

    #[test]
    fn axis_angles_reproduce_code_resolution() {
        let code = OrientationCode::from_code(26).expect("valid");
        let (azm, dip) = code.source.axis.angles();
        let (razm, rdip) = code.receiver.axis.angles();
        let res = resolve(
            FieldKind::Magnetic,
            &direction_cosines(azm, dip),
            FieldKind::Electric,
            &direction_cosines(razm, rdip),
        );
        assert_eq!(res, code.resolve());
    }
}
