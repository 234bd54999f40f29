//! Elementary field components in the wavenumber domain.
//!
//! The receiver is always electric. Horizontal components combine both modes
//! and need three spectral terms; the remaining ones involve the TM or TE mode
//! alone and a single `J1` or `J0` term.

use std::f64::consts::PI;

use crate::kernel::greens::{line_response, Excitation};
use crate::kernel::reflection::{ModalStack, Mode};
use crate::kernel::Placement;
use crate::materials::LayerResponse;
use crate::math::{CScalar, Scalar};
use crate::orientation::{Axis, ElementaryCode, FieldKind};
use crate::transform::hankel::{AngularFactors, SpectralTerms};

/// Kernel of one elementary component for a fixed frequency and placement.
#[derive(Debug, Clone, Copy)]
pub struct LayeredKernel<'a> {
    responses: &'a [LayerResponse],
    placement: Placement<'a>,
    code: ElementaryCode,
    include_direct: bool,
}

impl<'a> LayeredKernel<'a> {
    /// `responses` are the per-layer admittivities/impedivities at the working
    /// frequency. With `include_direct = false` the direct wave of a shared
    /// source/receiver layer is left out, to be added in the space domain.
    #[must_use]
    pub fn new(
        responses: &'a [LayerResponse],
        placement: Placement<'a>,
        code: ElementaryCode,
        include_direct: bool,
    ) -> Self {
        Self {
            responses,
            placement,
            code,
            include_direct,
        }
    }

    fn line(&self, mode: Mode, lambda: Scalar, excitation: Excitation) -> (CScalar, CScalar) {
        let stack = ModalStack::new(mode, lambda, self.responses, self.placement.interfaces);
        let out = line_response(&stack, &self.placement, excitation, self.include_direct);
        (out.voltage, out.current)
    }

    /// Spectral terms at wavenumber `lambda`, including the `1/2π` of the
    /// inverse transform.
    #[must_use]
    pub fn evaluate(&self, lambda: Scalar) -> SpectralTerms {
        let src = &self.responses[self.placement.source_layer];
        let rec = &self.responses[self.placement.receiver_layer];
        let l = lambda;
        let horizontal = |axis: Axis| axis != Axis::Z;
        let receiver = self.code.receiver;
        let source = self.code.source;

        let terms = match source.kind {
            FieldKind::Electric => match (horizontal(receiver), horizontal(source.axis)) {
                (true, true) => {
                    let (vm, _) = self.line(Mode::Tm, l, Excitation::Shunt);
                    let (ve, _) = self.line(Mode::Te, l, Excitation::Shunt);
                    SpectralTerms {
                        j0: -l * (vm + ve) * 0.5,
                        j1: vm - ve,
                        j0b: -l * (vm - ve) * 0.5,
                    }
                }
                (false, true) => {
                    let (_, im) = self.line(Mode::Tm, l, Excitation::Shunt);
                    SpectralTerms {
                        j1: l * l * im / rec.eta_v,
                        ..SpectralTerms::default()
                    }
                }
                (true, false) => {
                    let (vm, _) = self.line(Mode::Tm, l, Excitation::Series);
                    SpectralTerms {
                        j1: l * l * vm / src.eta_v,
                        ..SpectralTerms::default()
                    }
                }
                (false, false) => {
                    let (_, im) = self.line(Mode::Tm, l, Excitation::Series);
                    SpectralTerms {
                        j0: l * l * l * im / (src.eta_v * rec.eta_v),
                        ..SpectralTerms::default()
                    }
                }
            },
            FieldKind::Magnetic => match (horizontal(receiver), horizontal(source.axis)) {
                (true, true) => {
                    let (vm, _) = self.line(Mode::Tm, l, Excitation::Series);
                    let (ve, _) = self.line(Mode::Te, l, Excitation::Series);
                    SpectralTerms {
                        j0: l * (vm + ve) * 0.5,
                        j1: vm - ve,
                        j0b: l * (vm - ve) * 0.5,
                    }
                }
                (false, true) => {
                    let (_, im) = self.line(Mode::Tm, l, Excitation::Series);
                    SpectralTerms {
                        j1: l * l * im / rec.eta_v,
                        ..SpectralTerms::default()
                    }
                }
                (true, false) => {
                    let (ve, _) = self.line(Mode::Te, l, Excitation::Shunt);
                    SpectralTerms {
                        j1: l * l * ve / src.zeta_v,
                        ..SpectralTerms::default()
                    }
                }
                // A vertical magnetic dipole has no vertical electric field.
                (false, false) => SpectralTerms::default(),
            },
        };

        let scale = 1.0 / (2.0 * PI);
        SpectralTerms {
            j0: terms.j0 * scale,
            j1: terms.j1 * scale,
            j0b: terms.j0b * scale,
        }
    }
}

/// Angular factors of `code` for a receiver at azimuth `angle` (radians)
/// and horizontal distance `offset` from the source.
#[must_use]
pub fn angular_factors(code: ElementaryCode, angle: Scalar, offset: Scalar) -> AngularFactors {
    let (s, c) = angle.sin_cos();
    let (s2, c2) = (2.0 * angle).sin_cos();
    let inv = 1.0 / offset;
    let factors = |j0: Scalar, j1: Scalar, j0b: Scalar| AngularFactors { j0, j1, j0b };
    use Axis::{X, Y, Z};
    match (code.source.kind, code.receiver, code.source.axis) {
        (FieldKind::Electric, X, X) => factors(1.0, c2 * inv, c2),
        (FieldKind::Electric, X, Y) | (FieldKind::Electric, Y, X) => factors(0.0, s2 * inv, s2),
        (FieldKind::Electric, Y, Y) => factors(1.0, -c2 * inv, -c2),
        (FieldKind::Electric, Z, X) | (FieldKind::Electric, X, Z) => factors(0.0, c, 0.0),
        (FieldKind::Electric, Z, Y) | (FieldKind::Electric, Y, Z) => factors(0.0, s, 0.0),
        (FieldKind::Electric, Z, Z) => factors(1.0, 0.0, 0.0),
        (FieldKind::Magnetic, X, X) => factors(0.0, -s2 * inv, s2),
        (FieldKind::Magnetic, Y, X) => factors(1.0, c2 * inv, -c2),
        (FieldKind::Magnetic, X, Y) => factors(-1.0, c2 * inv, -c2),
        (FieldKind::Magnetic, Y, Y) => factors(0.0, s2 * inv, -s2),
        (FieldKind::Magnetic, Z, X) => factors(0.0, -s, 0.0),
        (FieldKind::Magnetic, Z, Y) => factors(0.0, c, 0.0),
        (FieldKind::Magnetic, X, Z) => factors(0.0, s, 0.0),
        (FieldKind::Magnetic, Y, Z) => factors(0.0, -c, 0.0),
        (FieldKind::Magnetic, Z, Z) => AngularFactors::default(),
    }
}
