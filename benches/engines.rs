//! Benchmarks comparing the emulated, portable and best available engine chains

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use genops::{
    best_available_engine, best_engine_name, portable_engine, BinaryOp, EmulatedEngine,
    Operands, VectorEngine, VectorOps,
};
use std::sync::Arc;

/// Generate test data with specific patterns
fn generate_f64(size: usize) -> Vec<f64> {
    (0..size).map(|i| (i as f64 * 0.1).sin() * 100.0).collect()
}

fn generate_i32(size: usize) -> Vec<i32> {
    (0..size).map(|i| (i as i32).wrapping_mul(7919) % 10_007).collect()
}

fn engines() -> Vec<(&'static str, Arc<dyn VectorEngine>)> {
    let emulated: Arc<dyn VectorEngine> = EmulatedEngine::global();
    let mut engines = vec![("emulated", emulated), ("portable", portable_engine())];
    if best_engine_name() != "portable" {
        engines.push((best_engine_name(), best_available_engine()));
    }
    engines
}

/// Benchmark vector-vector float arithmetic
fn bench_f64_binary(c: &mut Criterion) {
    let mut group = c.benchmark_group("f64_binary");

    for &size in &[64, 1_000, 100_000] {
        let a = generate_f64(size);
        let b = generate_f64(size + 1)[1..].to_vec();
        let mut dst = vec![0.0; size];

        for op in [BinaryOp::Add, BinaryOp::Multiply] {
            for (name, engine) in engines() {
                group.bench_with_input(
                    BenchmarkId::new(format!("{name}/{op:?}"), size),
                    &(&a, &b),
                    |bench, (a, b)| {
                        bench.iter(|| {
                            engine
                                .binary(op, Operands::VectorVector(&a[..], &b[..]), &mut dst)
                                .unwrap();
                            black_box(&dst);
                        });
                    },
                );
            }
        }
    }

    group.finish();
}

/// Benchmark integer arithmetic with a scalar operand
fn bench_i32_scalar(c: &mut Criterion) {
    let mut group = c.benchmark_group("i32_vector_scalar");

    for &size in &[64, 1_000, 100_000] {
        let a = generate_i32(size);
        let mut dst = vec![0; size];

        for (name, engine) in engines() {
            group.bench_with_input(BenchmarkId::new(name, size), &a, |bench, a| {
                bench.iter(|| {
                    engine.multiply_scalar(a, black_box(&3), &mut dst).unwrap();
                    black_box(&dst);
                });
            });
        }
    }

    group.finish();
}

/// Benchmark operations no kernel set accelerates
fn bench_fallback_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("fallback_overhead");
    let a = generate_i32(10_000);
    let b: Vec<i32> = a.iter().map(|x| x.abs() + 1).collect();
    let mut dst = vec![0; a.len()];

    for (name, engine) in engines() {
        group.bench_function(BenchmarkId::new("divide", name), |bench| {
            bench.iter(|| {
                engine.divide(&a, &b, &mut dst).unwrap();
                black_box(&dst);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_f64_binary, bench_i32_scalar, bench_fallback_overhead);
criterion_main!(benches);
