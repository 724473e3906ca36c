//! Solver benchmarks.
//!
//! Wall-clock cost of both DP variants and the reference algorithms on
//! seeded random instances. The quantum variant does strictly more
//! bookkeeping per step than the classical one, so its wall-clock time is
//! expected to be slightly higher; its advantage shows only in the query
//! counts.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use qtsp::engine::SolverRng;
use qtsp::tsp::{
    brute_force, nearest_neighbor, two_opt, GeneticSearch, HeldKarpSolver, SimulatedAnnealing,
    TspInstance,
};

const SEED: u64 = 42;
const MAX_WEIGHT: u64 = 100;

fn instance(n: usize) -> TspInstance {
    TspInstance::random(n, MAX_WEIGHT, &mut SolverRng::stream(SEED, n as u64))
}

fn bench_dp(c: &mut Criterion) {
    let mut group = c.benchmark_group("held_karp");
    group.sample_size(30);
    let solver = HeldKarpSolver::default();

    for n in [6, 9, 12] {
        let inst = instance(n);
        group.bench_with_input(BenchmarkId::new("classical", n), &inst, |b, inst| {
            b.iter(|| black_box(solver.solve_classical(inst)));
        });
        group.bench_with_input(BenchmarkId::new("quantum", n), &inst, |b, inst| {
            b.iter(|| black_box(solver.solve_quantum(inst, 3, None)));
        });
    }

    group.finish();
}

fn bench_reference(c: &mut Criterion) {
    let mut group = c.benchmark_group("reference");

    for n in [6, 8] {
        let inst = instance(n);
        group.bench_with_input(BenchmarkId::new("brute_force", n), &inst, |b, inst| {
            b.iter(|| black_box(brute_force(inst)));
        });
    }
    for n in [12, 50] {
        let inst = instance(n);
        group.bench_with_input(BenchmarkId::new("nearest_neighbor", n), &inst, |b, inst| {
            b.iter(|| black_box(nearest_neighbor(inst)));
        });
        group.bench_with_input(BenchmarkId::new("two_opt", n), &inst, |b, inst| {
            b.iter(|| black_box(two_opt(inst)));
        });
        group.bench_with_input(BenchmarkId::new("simulated_annealing", n), &inst, |b, inst| {
            b.iter(|| black_box(SimulatedAnnealing::default().solve(inst)));
        });
    }
    let inst = instance(12);
    group.bench_with_input(BenchmarkId::new("genetic", 12), &inst, |b, inst| {
        b.iter(|| black_box(GeneticSearch::default().solve(inst)));
    });

    group.finish();
}

criterion_group!(benches, bench_dp, bench_reference);
criterion_main!(benches);
