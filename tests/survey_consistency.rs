//! Consistency of the public entry points with each other: orientation
//! resolution, pole integration, shortcuts and time-domain transforms.

use approx::assert_relative_eq;
use em_strata::prelude::*;

fn code(ab: u8) -> OrientationCode {
    OrientationCode::from_code(ab).expect("valid code")
}

fn layered() -> LayeredModel {
    LayeredModel::new(&[100.0, 1000.0], &[2.0, 0.3, 100.0])
        .and_then(|m| m.with_anisotropy(&[2.0, 0.5, 2.0]))
        .expect("valid model")
}

fn csem() -> LayeredModel {
    LayeredModel::new(&[0.0, 1000.0], &[2.0e14, 1.0, 100.0]).expect("valid model")
}

fn first(out: Response) -> CScalar {
    out.into_frequency().expect("frequency response").at(0, 0, 0)
}

fn assert_complex_eq(a: CScalar, b: CScalar, tol: Scalar) {
    assert_relative_eq!(a.re, b.re, max_relative = tol, epsilon = tol * b.norm());
    assert_relative_eq!(a.im, b.im, max_relative = tol, epsilon = tol * b.norm());
}

#[test]
fn orientation_code_matches_explicit_angles() {
    let src = R3::new(5000.0, 1000.0, -200.0);
    let rec = R3::new(0.0, 0.0, 1200.0);
    let model = layered();
    let config = SimulationConfig::default();
    let coded = first(dipole(&[src], &[rec], &model, &[0.01], code(26), &config).expect("valid"));
    let explicit = first(
        bipole(
            &[Pole::dipole(src, 0.0, 90.0).magnetic()],
            &[Pole::dipole(rec, 90.0, 0.0)],
            &model,
            &[0.01],
            &config,
        )
        .expect("valid"),
    );
    assert_eq!(coded, explicit);
    assert!(coded.norm() > 0.0);
}

#[test]
fn shortcuts_equal_dipole() {
    let src = [R3::new(0.0, 0.0, 250.0)];
    let rec = [R3::new(3000.0, 500.0, 300.0), R3::new(5000.0, 500.0, 300.0)];
    let model = csem();
    let freqs = [0.25, 1.0];
    let short = frequency(&src, &rec, &model, &freqs, code(12)).expect("valid");
    let full = dipole(&src, &rec, &model, &freqs, code(12), &SimulationConfig::default())
        .ok()
        .and_then(Response::into_frequency)
        .expect("frequency response");
    assert_eq!(short, full);

    let times = [0.5, 2.0];
    let short = time(&src, &rec[..1], &model, &times, code(11), Signal::StepOff, FourierMethod::dlf())
        .expect("valid");
    let config = SimulationConfig::time(Signal::StepOff, FourierMethod::dlf());
    let full = dipole(&src, &rec[..1], &model, &times, code(11), &config)
        .ok()
        .and_then(Response::into_time)
        .expect("time response");
    assert_eq!(short, full);
}

#[test]
fn magnetic_receiver_is_the_reciprocal_electric_source() {
    let a = R3::new(0.0, 0.0, 150.0);
    let b = R3::new(2000.0, -700.0, 600.0);
    let model = layered();
    let config = SimulationConfig::default();
    let h41 = first(dipole(&[a], &[b], &model, &[0.1], code(41), &config).expect("valid"));
    let e14 = first(dipole(&[b], &[a], &model, &[0.1], code(14), &config).expect("valid"));
    assert_complex_eq(h41, -e14, 1.0e-13);
}

#[test]
fn oblique_source_projects_onto_axes() {
    let src = R3::new(0.0, 0.0, 250.0);
    let rec = R3::new(3000.0, 1000.0, 300.0);
    let model = csem();
    let config = SimulationConfig::default();
    let oblique = first(
        bipole(
            &[Pole::dipole(src, 30.0, 0.0)],
            &[Pole::dipole(rec, 0.0, 0.0)],
            &model,
            &[0.5],
            &config,
        )
        .expect("valid"),
    );
    let ex = first(dipole(&[src], &[rec], &model, &[0.5], code(11), &config).expect("valid"));
    let ey = first(dipole(&[src], &[rec], &model, &[0.5], code(12), &config).expect("valid"));
    let (s, c) = 30.0_f64.to_radians().sin_cos();
    assert_complex_eq(oblique, ex * c + ey * s, 1.0e-12);
}

#[test]
fn finite_bipole_averages_its_gauss_points() {
    let model = csem();
    let config = SimulationConfig::default();
    let source = Pole::from_endpoints(R3::new(-50.0, 0.0, 250.0), R3::new(50.0, 0.0, 250.0))
        .with_points(3);
    let rec = R3::new(2000.0, 300.0, 300.0);
    let receiver = Pole::dipole(rec, 0.0, 0.0);
    let finite = first(bipole(&[source], &[receiver], &model, &[1.0], &config).expect("valid"));

    let offset = 50.0 * (0.6_f64).sqrt();
    let points = [
        (R3::new(-offset, 0.0, 250.0), 5.0 / 18.0),
        (R3::new(0.0, 0.0, 250.0), 8.0 / 18.0),
        (R3::new(offset, 0.0, 250.0), 5.0 / 18.0),
    ];
    let sum: CScalar = points
        .iter()
        .map(|&(p, w)| {
            first(dipole(&[p], &[rec], &model, &[1.0], code(11), &config).expect("valid")) * w
        })
        .sum();
    assert_complex_eq(finite, sum, 1.0e-10);
}

fn dc_setup() -> (LayeredModel, [R3; 1], [R3; 1], SimulationConfig) {
    let model = LayeredModel::fullspace(10.0).expect("valid model");
    (
        model,
        [R3::zeros()],
        [R3::new(1000.0, 0.0, 0.1)],
        SimulationConfig::default().with_xdirect(true),
    )
}

#[test]
fn step_on_settles_to_the_dc_field() {
    let (model, src, rec, config) = dc_setup();
    let dc = first(dipole(&src, &rec, &model, &[1.0e-9], code(11), &config).expect("valid")).re;
    let config = SimulationConfig {
        domain: SimulationDomain::Time {
            signal: Signal::StepOn,
            method: FourierMethod::dlf(),
        },
        ..config
    };
    let late = dipole(&src, &rec, &model, &[100.0], code(11), &config)
        .ok()
        .and_then(Response::into_time)
        .expect("time response")
        .at(0, 0, 0);
    assert_relative_eq!(late, dc, max_relative = 1.0e-4);
}

#[test]
fn step_on_and_step_off_add_up_to_dc() {
    let (model, src, rec, config) = dc_setup();
    let dc = first(dipole(&src, &rec, &model, &[1.0e-9], code(11), &config).expect("valid")).re;
    let times = [0.01, 0.05, 0.2];
    let run = |signal: Signal| {
        let config = SimulationConfig {
            domain: SimulationDomain::Time {
                signal,
                method: FourierMethod::dlf(),
            },
            ..config.clone()
        };
        dipole(&src, &rec, &model, &times, code(11), &config)
            .ok()
            .and_then(Response::into_time)
            .expect("time response")
            .series(0, 0)
    };
    let on = run(Signal::StepOn);
    let off = run(Signal::StepOff);
    for (a, b) in on.iter().zip(&off) {
        assert_relative_eq!(a + b, dc, max_relative = 1.0e-6);
    }
}

#[test]
fn fourier_methods_agree_on_a_step_response() {
    let (model, src, rec, config) = dc_setup();
    let times = logspace(0.01, 1.0, 5);
    let run = |method: FourierMethod| {
        let config = SimulationConfig {
            domain: SimulationDomain::Time {
                signal: Signal::StepOn,
                method,
            },
            ..config.clone()
        };
        dipole(&src, &rec, &model, &times, code(11), &config)
            .ok()
            .and_then(Response::into_time)
            .expect("time response")
    };
    let dlf = run(FourierMethod::dlf()).series(0, 0);
    let peak = dlf.iter().fold(0.0_f64, |m, v| m.max(v.abs()));

    let fftlog = run(FourierMethod::fftlog());
    for (a, b) in fftlog.series(0, 0).iter().zip(&dlf) {
        assert!((a - b).abs() <= 1.0e-2 * peak, "FFTLog {a} vs filter {b}");
    }

    let qwe = run(FourierMethod::qwe());
    assert!(qwe.is_converged());
    for (a, b) in qwe.series(0, 0).iter().zip(&dlf) {
        assert_relative_eq!(*a, *b, max_relative = 1.0e-6);
    }
}

#[test]
fn fftlog_step_off_error_is_bounded_by_the_dc_level() {
    let (model, src, rec, config) = dc_setup();
    let dc = first(dipole(&src, &rec, &model, &[1.0e-9], code(11), &config).expect("valid")).re;
    let times = [0.01, 0.1, 1.0, 10.0];
    let run = |method: FourierMethod| {
        let config = SimulationConfig {
            domain: SimulationDomain::Time {
                signal: Signal::StepOff,
                method,
            },
            ..config.clone()
        };
        dipole(&src, &rec, &model, &times, code(11), &config)
            .ok()
            .and_then(Response::into_time)
            .expect("time response")
            .series(0, 0)
    };
    let dlf = run(FourierMethod::dlf());
    let fftlog = run(FourierMethod::fftlog());
    for (a, b) in fftlog.iter().zip(&dlf) {
        assert!((a - b).abs() <= 1.0e-3 * dc.abs(), "FFTLog {a} vs filter {b}, DC {dc}");
    }
}
