//! Criterion benchmarks for drone-sweep.
//!
//! Missions are drawn from seeded signal maps, so every run benchmarks
//! the same instances.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use drone_sweep::constructive::{ConstructiveConfig, ConstructiveRunner};
use drone_sweep::instance::{AnnealingParams, Instance};
use drone_sweep::map::SignalMap;
use drone_sweep::random::create_rng;
use drone_sweep::sa::{RouteAnnealing, SaConfig, SaRunner};
use drone_sweep::simulation::{ConditionFactors, MonteCarlo, MonteCarloConfig, RewardSimulator};

fn mission(nodes: usize, fleet: usize, budget: f64) -> Instance {
    let map = SignalMap::generate(10, nodes, &mut create_rng(1025747)).unwrap();
    Instance::new("bench", fleet, budget, map.node_list())
        .unwrap()
        .with_annealing(AnnealingParams::new(1000.0, 0.95, 0.1))
        .unwrap()
}

fn simulator(trials: usize, parallel: bool) -> MonteCarlo {
    MonteCarlo::new(
        ConditionFactors::drone_sweep(),
        MonteCarloConfig::default()
            .with_trials(trials)
            .with_seed(7)
            .with_parallel(parallel),
    )
    .unwrap()
}

// ===========================================================================
// Monte Carlo estimation
// ===========================================================================

fn bench_estimate(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate");
    group.sample_size(20);

    let instance = mission(20, 2, 42.5);
    let solution = ConstructiveRunner::run(
        &instance,
        &simulator(50, false),
        &ConstructiveConfig::default(),
    )
    .unwrap()
    .deterministic;

    for &trials in &[100, 1000] {
        for parallel in [false, true] {
            let sim = simulator(trials, parallel);
            let id = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(id, trials), &sim, |b, sim| {
                b.iter(|| black_box(sim.estimate(black_box(solution.routes()))))
            });
        }
    }
    group.finish();
}

// ===========================================================================
// Engines
// ===========================================================================

fn bench_constructive(c: &mut Criterion) {
    let mut group = c.benchmark_group("constructive");
    group.sample_size(10);

    let sim = simulator(100, true);
    for &nodes in &[10, 25] {
        let instance = mission(nodes, 2, 42.5);
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &instance, |b, inst| {
            b.iter(|| {
                let result =
                    ConstructiveRunner::run(black_box(inst), &sim, &ConstructiveConfig::default());
                black_box(result)
            })
        });
    }
    group.finish();
}

fn bench_annealing(c: &mut Criterion) {
    let mut group = c.benchmark_group("annealing");
    group.sample_size(10);

    let sim = simulator(100, true);
    for &nodes in &[10, 25] {
        let instance = mission(nodes, 4, 42.5);
        let config = SaConfig::default()
            .with_initial_temperature(1000.0)
            .with_cooling_rate(0.95)
            .with_min_temperature(0.1)
            .with_seed(8634452);
        let problem = RouteAnnealing::new(&instance, &sim, config.max_neighbor_attempts);
        group.bench_with_input(
            BenchmarkId::from_parameter(nodes),
            &(problem, config),
            |b, (p, c)| {
                b.iter(|| {
                    let result = SaRunner::run(black_box(p), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_estimate, bench_constructive, bench_annealing);
criterion_main!(benches);
