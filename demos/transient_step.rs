use em_strata::prelude::*;

fn main() -> Result<(), StrataError> {
    env_logger::init();

    // Land TEM: inline electric field of a grounded wire over a layered earth.
    let model = LayeredModel::new(&[0.0, 50.0, 300.0], &[2.0e14, 30.0, 3.0, 100.0])?;
    let src = [R3::new(0.0, 0.0, 0.001)];
    let rec = [R3::new(500.0, 0.0, 0.001)];
    let ab = OrientationCode::from_code(11)?;
    let times = logspace(1.0e-4, 1.0, 21);

    let on = time(&src, &rec, &model, &times, ab, Signal::StepOn, FourierMethod::dlf())?;
    let off = time(&src, &rec, &model, &times, ab, Signal::StepOff, FourierMethod::fftlog())?;
    for warning in on.warnings.iter().chain(&off.warnings) {
        eprintln!("{warning}");
    }

    println!("time(s), step-on(V/m), step-off(V/m)");
    for ((t, a), b) in times.iter().zip(on.series(0, 0)).zip(off.series(0, 0)) {
        println!("{t:.4e}, {a:.6e}, {b:.6e}");
    }
    Ok(())
}
