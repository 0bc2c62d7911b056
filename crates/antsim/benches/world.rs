use antsim::{HomeConfig, SimConfig, Simulation};
use antsim_core::SplitMix64;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn make_sim(per_colony: usize, seed: u64) -> (Simulation, SplitMix64) {
    let mut config = SimConfig::default();
    config.colony.initial_population = per_colony;
    config.colony.capacity = per_colony * 2;
    config.colonies = vec![
        HomeConfig { x: 400.0, y: 450.0 },
        HomeConfig { x: 1200.0, y: 450.0 },
    ];
    let mut rng = SplitMix64::new(seed);
    let sim = Simulation::new(config, &mut rng).expect("default config is valid");
    (sim, rng)
}

fn bench_world(c: &mut Criterion) {
    let dt = 0.016;
    let mut group = c.benchmark_group("antsim/step");

    for &n in &[1_000usize, 4_000usize] {
        let (mut sim, mut rng) = make_sim(n, 7);
        group.bench_with_input(BenchmarkId::from_parameter(n * 2), &n, |b, &_n| {
            b.iter(|| {
                let report = sim.step(dt, &mut rng);
                black_box(report);
            })
        });
    }

    group.finish();
}

fn bench_decay(c: &mut Criterion) {
    let (mut sim, _) = make_sim(0, 1);
    c.bench_function("antsim/decay_tick", |b| {
        b.iter(|| {
            sim.grid_mut().decay_tick(black_box(0.016));
        })
    });
}

criterion_group!(benches, bench_world, bench_decay);
criterion_main!(benches);
