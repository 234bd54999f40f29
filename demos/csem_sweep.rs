use em_strata::prelude::*;

fn main() -> Result<(), StrataError> {
    env_logger::init();

    // Marine CSEM: air, 1 km of sea water, sediments with a thin resistor.
    let model = LayeredModel::new(&[0.0, 1000.0, 2000.0, 2100.0], &[2.0e14, 0.3, 1.0, 50.0, 1.0])?
        .with_anisotropy(&[1.0, 1.0, 1.5, 1.0, 1.5])?;
    let source = Pole::from_endpoints(R3::new(-125.0, 0.0, 950.0), R3::new(125.0, 0.0, 950.0))
        .with_points(5);
    let receivers: Vec<Pole> = linspace(1000.0, 12_000.0, 12)
        .into_iter()
        .map(|x| Pole::dipole(R3::new(x, 0.0, 1000.0), 0.0, 0.0))
        .collect();
    let config = SimulationConfig::default().with_strength(1.0);

    let out = bipole(&[source], &receivers, &model, &[0.25], &config)?;
    let ex: Vec<CScalar> = out
        .into_frequency()
        .map(|m| m.values[0].column(0).iter().copied().collect())
        .unwrap_or_default();

    let amplitude = mag(ex.iter().copied());
    let phase = phase_deg(ex.iter().copied());

    println!("offset(m), |Ex|(V/m), phase(deg)");
    for ((rec, a), p) in receivers.iter().zip(amplitude).zip(phase) {
        println!("{:.1}, {:.6e}, {:.2}", rec.center.x, a, p);
    }
    Ok(())
}
