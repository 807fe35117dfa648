//! Benchmarks for the generational step.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use dna_evolution::{EngineConfig, EvolutionEngine, compute::evolution::byte_sum};

fn bench_next_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("next_generation");

    for size in [64, 256, 1024] {
        let config = EngineConfig {
            dna_length: 256,
            parallel_scoring: false,
            random_seed: Some(42),
            ..Default::default()
        };
        let mut engine = EvolutionEngine::new(byte_sum, config).unwrap();
        engine.initialize_population(size).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                black_box(&mut engine).next_generation().unwrap();
            });
        });
    }

    group.finish();
}

fn bench_parallel_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("scoring_mode");

    // A deliberately slow scorer so scoring dominates the step.
    let slow = |dna: &[u8]| {
        let mut acc = 0u32;
        for _ in 0..64 {
            for &b in dna {
                acc = acc.wrapping_mul(31).wrapping_add(b as u32);
            }
        }
        (acc % 1000) as f32
    };

    for parallel in [false, true] {
        let config = EngineConfig {
            dna_length: 256,
            parallel_scoring: parallel,
            random_seed: Some(7),
            ..Default::default()
        };
        let mut engine = EvolutionEngine::new(slow, config).unwrap();
        engine.initialize_population(512).unwrap();

        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_with_input(BenchmarkId::from_parameter(label), &parallel, |b, _| {
            b.iter(|| {
                black_box(&mut engine).next_generation().unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_next_generation, bench_parallel_scoring);
criterion_main!(benches);
