//! Criterion micro-benchmarks for simulator steps and their phases.

use std::hint::black_box;

use cosmos_bench::{grown_simulator, reference_profile, stress_profile};
use cosmos_core::Coord;
use cosmos_engine::{diffuse, expand, DiffusionConfig, GenerationConfig, UniverseSimulator};
use cosmos_test_utils::uniform_grid;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Benchmark: one full step of a simulator already grown for 20 steps.
fn bench_step_grown_20(c: &mut Criterion) {
    let sim = grown_simulator(reference_profile(42), 20).unwrap();
    let config = sim.config().clone();
    let saved = sim.save();

    c.bench_function("step_grown_20", |b| {
        b.iter_batched(
            || UniverseSimulator::restore(config.clone(), saved.clone()).unwrap(),
            |mut sim| {
                black_box(sim.step());
                sim
            },
            BatchSize::LargeInput,
        );
    });
}

/// Benchmark: one diffusion pass over a 101 x 101 grid.
fn bench_diffuse_10k(c: &mut Criterion) {
    let grid = uniform_grid(50, 1.0);
    let config = DiffusionConfig::default();

    c.bench_function("diffuse_10k", |b| {
        b.iter_batched(
            || grid.clone(),
            |mut g| {
                black_box(diffuse(&mut g, &config));
                g
            },
            BatchSize::LargeInput,
        );
    });
}

/// Benchmark: grow a 101 x 101 grid by one ring.
fn bench_expand_ring_10k(c: &mut Criterion) {
    let grid = uniform_grid(50, 1.0);
    let generation = GenerationConfig::default();

    c.bench_function("expand_ring_10k", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        b.iter(|| {
            let e = expand(&grid, 1, 1_000, &mut rng, &generation, Some(7));
            black_box(e.generated.len());
        });
    });
}

/// Benchmark: body generation for 1000 hot, dense cells.
fn bench_generate_bodies_1k(c: &mut Criterion) {
    c.bench_function("generate_bodies_1k", |b| {
        b.iter(|| {
            for i in 0..1000i32 {
                let bodies = cosmos_core::generate_bodies(9, Coord::new(i, -i), 10.0, 10_000.0);
                black_box(&bodies);
            }
        });
    });
}

/// Benchmark: forty steps from the origin on a large span.
fn bench_stress_40_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("stress");
    group.sample_size(10);
    group.bench_function("stress_40_steps", |b| {
        b.iter(|| black_box(grown_simulator(stress_profile(1), 40).unwrap().grid().len()));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_step_grown_20,
    bench_diffuse_10k,
    bench_expand_ring_10k,
    bench_generate_bodies_1k,
    bench_stress_40_steps
);
criterion_main!(benches);
