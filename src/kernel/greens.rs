//! Voltage and current of the layered transmission line excited by a point
//! source, the scalar building blocks of the wavenumber-domain fields.

use crate::kernel::reflection::{thickness, ModalStack};
use crate::kernel::Placement;
use crate::math::CScalar;

/// Type of the point source on the transmission line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Excitation {
    /// Unit current source in parallel with the line.
    Shunt,
    /// Unit voltage source in series with the line.
    Series,
}

/// Voltage `V` and current `I` at the receiver depth.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LineResponse {
    /// Voltage, the transverse electric or magnetic field of the mode.
    pub voltage: CScalar,
    /// Current, the dual transverse field of the mode.
    pub current: CScalar,
}

/// Green's functions of the modal line for the source/receiver placement.
///
/// With `include_direct = false` the unbounded-medium wave of the source layer
/// is omitted; it only matters when source and receiver share a layer.
#[must_use]
pub fn line_response(
    stack: &ModalStack,
    placement: &Placement<'_>,
    excitation: Excitation,
    include_direct: bool,
) -> LineResponse {
    let interfaces = placement.interfaces;
    let s = placement.source_layer;
    let r = placement.receiver_layer;
    let zs = placement.z_source;
    let zr = placement.z_receiver;

    let g = stack.gamma[s];
    let z = stack.impedance[s];
    let (a_plus, a_minus) = match excitation {
        Excitation::Shunt => (z * 0.5, z * 0.5),
        Excitation::Series => (CScalar::new(0.5, 0.0), CScalar::new(-0.5, 0.0)),
    };

    let top = placement.top(s);
    let bottom = placement.bottom(s);
    let rho_up = stack.up[s];
    let rho_down = stack.down[s];
    // Multiple reflections between the two bounding interfaces.
    let (h, denominator) = match (top, bottom) {
        (Some(t), Some(b)) => {
            let h = b - t;
            (h, 1.0 - rho_up * rho_down * (-2.0 * g * h).exp())
        }
        _ => (0.0, CScalar::new(1.0, 0.0)),
    };
    let decay = |d: f64| (-g * d).exp();

    let mut out = LineResponse::default();

    if r == s {
        if include_direct {
            if zr > zs {
                let e = a_plus * decay(zr - zs);
                out.voltage += e;
                out.current += e / z;
            } else if zr < zs {
                let e = a_minus * decay(zs - zr);
                out.voltage += e;
                out.current -= e / z;
            } else {
                out.voltage += (a_plus + a_minus) * 0.5;
                out.current += (a_plus - a_minus) / (2.0 * z);
            }
        }
        if let Some(t) = top {
            let mut wave = a_minus * decay(zs - t);
            if let Some(b) = bottom {
                wave += rho_down * a_plus * decay(h + b - zs);
            }
            let e = rho_up * wave / denominator * decay(zr - t);
            out.voltage += e;
            out.current += e / z;
        }
        if let Some(b) = bottom {
            let mut wave = a_plus * decay(b - zs);
            if let Some(t) = top {
                wave += rho_up * a_minus * decay(h + zs - t);
            }
            let e = rho_down * wave / denominator * decay(b - zr);
            out.voltage += e;
            out.current -= e / z;
        }
        return out;
    }

    if r > s {
        // Down-going amplitude at the bottom of the source layer.
        let b = bottom.unwrap_or(zs);
        let mut wave = a_plus * decay(b - zs);
        if let Some(t) = top {
            wave += rho_up * a_minus * decay(h + zs - t);
        }
        let mut amplitude = wave / denominator;
        let mut at_top = amplitude;
        let last = stack.len() - 1;
        for k in s + 1..=r {
            let transmitted = 1.0 + stack.down[k - 1];
            let standing = if k == last {
                CScalar::new(1.0, 0.0)
            } else {
                1.0 + stack.down[k] * (-2.0 * stack.gamma[k] * thickness(interfaces, k)).exp()
            };
            at_top = amplitude * transmitted / standing;
            if k < r {
                amplitude = at_top * (-stack.gamma[k] * thickness(interfaces, k)).exp();
            }
        }
        let gr = stack.gamma[r];
        let t_r = placement.top(r).unwrap_or(zr);
        let e1 = (-gr * (zr - t_r)).exp();
        let e2 = match placement.bottom(r) {
            Some(b_r) => stack.down[r] * (-gr * (2.0 * b_r - zr - t_r)).exp(),
            None => CScalar::new(0.0, 0.0),
        };
        out.voltage = at_top * (e1 + e2);
        out.current = at_top * (e1 - e2) / stack.impedance[r];
        return out;
    }

    // Receiver above the source: up-going amplitude at the top of the source layer.
    let t = top.unwrap_or(zs);
    let mut wave = a_minus * decay(zs - t);
    if let Some(b) = bottom {
        wave += rho_down * a_plus * decay(h + b - zs);
    }
    let mut amplitude = wave / denominator;
    let mut at_bottom = amplitude;
    for k in (r..s).rev() {
        let transmitted = 1.0 + stack.up[k + 1];
        let standing = if k == 0 {
            CScalar::new(1.0, 0.0)
        } else {
            1.0 + stack.up[k] * (-2.0 * stack.gamma[k] * thickness(interfaces, k)).exp()
        };
        at_bottom = amplitude * transmitted / standing;
        if k > r {
            amplitude = at_bottom * (-stack.gamma[k] * thickness(interfaces, k)).exp();
        }
    }
    let gr = stack.gamma[r];
    let b_r = placement.bottom(r).unwrap_or(zr);
    let e1 = (-gr * (b_r - zr)).exp();
    let e2 = match placement.top(r) {
        Some(t_r) => stack.up[r] * (-gr * (b_r + zr - 2.0 * t_r)).exp(),
        None => CScalar::new(0.0, 0.0),
    };
    out.voltage = at_bottom * (e1 + e2);
    out.current = at_bottom * (e2 - e1) / stack.impedance[r];
    out
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::constants::angular_frequency;
    use crate::kernel::reflection::Mode;
    use crate::materials::{LayerMaterial, LayerResponse};

    fn layers(res: &[f64], hz: f64) -> Vec<LayerResponse> {
        res.iter()
            .map(|&r| LayerMaterial::isotropic(r).response(angular_frequency(hz)))
            .collect()
    }

    fn placement<'a>(interfaces: &'a [f64], zs: f64, zr: f64) -> Placement<'a> {
        Placement::new(interfaces, zs, zr)
    }

    #[test]
    fn unbounded_line_reduces_to_direct_wave() {
        let resp = layers(&[5.0], 2.0);
        let stack = ModalStack::new(Mode::Te, 0.02, &resp, &[]);
        let out = line_response(&stack, &placement(&[], 10.0, 60.0), Excitation::Shunt, true);
        let g = stack.gamma[0];
        let z = stack.impedance[0];
        let expected = z * 0.5 * (-g * 50.0).exp();
        assert_relative_eq!(out.voltage.re, expected.re, max_relative = 1.0e-13);
        assert_relative_eq!(out.voltage.im, expected.im, max_relative = 1.0e-13);
        assert_relative_eq!((out.current * z).re, expected.re, max_relative = 1.0e-13);
    }

    #[test]
    fn transparent_interfaces_match_unbounded_line() {
        let uniform = layers(&[5.0, 5.0, 5.0, 5.0], 2.0);
        let interfaces = [0.0, 40.0, 90.0];
        let single = layers(&[5.0], 2.0);
        for (zs, zr) in [(20.0, 130.0), (130.0, -15.0), (60.0, 70.0), (60.0, 60.0)] {
            for excitation in [Excitation::Shunt, Excitation::Series] {
                for mode in [Mode::Tm, Mode::Te] {
                    let layered = ModalStack::new(mode, 0.03, &uniform, &interfaces);
                    let bulk = ModalStack::new(mode, 0.03, &single, &[]);
                    let a = line_response(&layered, &placement(&interfaces, zs, zr), excitation, true);
                    let b = line_response(&bulk, &placement(&[], zs, zr), excitation, true);
                    assert_relative_eq!(a.voltage.re, b.voltage.re, max_relative = 1.0e-12);
                    assert_relative_eq!(a.voltage.im, b.voltage.im, max_relative = 1.0e-12);
                    assert_relative_eq!(a.current.re, b.current.re, max_relative = 1.0e-12);
                    assert_relative_eq!(a.current.im, b.current.im, max_relative = 1.0e-12);
                }
            }
        }
    }

    #[test]
    fn shunt_voltage_is_reciprocal() {
        let resp = layers(&[1.0e6, 2.0, 0.3, 50.0], 0.5);
        let interfaces = [0.0, 120.0, 700.0];
        let stack = ModalStack::new(Mode::Tm, 0.004, &resp, &interfaces);
        let forward = line_response(&stack, &placement(&interfaces, 50.0, 900.0), Excitation::Shunt, true);
        let backward =
            line_response(&stack, &placement(&interfaces, 900.0, 50.0), Excitation::Shunt, true);
        assert_relative_eq!(forward.voltage.re, backward.voltage.re, max_relative = 1.0e-10);
        assert_relative_eq!(forward.voltage.im, backward.voltage.im, max_relative = 1.0e-10);
    }

    #[test]
    fn direct_wave_can_be_removed() {
        let resp = layers(&[5.0], 2.0);
        let stack = ModalStack::new(Mode::Te, 0.02, &resp, &[]);
        let out = line_response(&stack, &placement(&[], 10.0, 60.0), Excitation::Shunt, false);
        assert_eq!(out, LineResponse::default());
    }
}
