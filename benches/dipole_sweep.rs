use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use em_strata::prelude::*;

fn csem_model() -> LayeredModel {
    LayeredModel::new(&[0.0, 1000.0, 2000.0, 2100.0], &[2.0e14, 0.3, 1.0, 50.0, 1.0])
        .and_then(|m| m.with_anisotropy(&[1.0, 1.0, 1.5, 1.0, 1.5]))
        .expect("valid model")
}

fn bench_dipole_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("dipole_sweep");
    let model = csem_model();
    let src = [R3::new(0.0, 0.0, 950.0)];
    let rec: Vec<R3> = linspace(500.0, 10_000.0, 40)
        .into_iter()
        .map(|x| R3::new(x, 0.0, 1000.0))
        .collect();
    let freqs = logspace(0.05, 5.0, 11);
    let ab = OrientationCode::from_code(11).expect("valid code");

    for (name, method) in [("dlf", HankelMethod::dlf()), ("qwe", HankelMethod::qwe())] {
        let config = SimulationConfig::default().with_hankel(method);
        group.bench_function(BenchmarkId::new(name, rec.len() * freqs.len()), |b| {
            b.iter(|| {
                let _ = dipole(&src, &rec, &model, &freqs, ab, &config);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dipole_sweep);
criterion_main!(benches);
