//! Criterion benchmarks for the simplex and branch-and-cut engine.
//!
//! Uses seeded random instances so runs are comparable across changes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_linprog::generate::{random_integer_model, random_knapsack, random_lp};
use u_linprog::{solve, solve_batch, PivotRule, SolveOptions};

// ===========================================================================
// LP
// ===========================================================================

fn bench_simplex(c: &mut Criterion) {
    let mut group = c.benchmark_group("simplex");
    group.sample_size(10);

    for (vars, rows) in [(10usize, 10usize), (30, 20), (60, 40)] {
        let model = random_lp(vars, rows, 42).unwrap();
        for rule in [PivotRule::Dantzig, PivotRule::Bland] {
            let options = SolveOptions::default().with_pivot_rule(rule);
            group.bench_with_input(
                BenchmarkId::new(format!("{rule:?}"), format!("v{}_r{}", vars, rows)),
                &(model.clone(), options),
                |b, (m, o)| {
                    b.iter(|| {
                        let result = solve(black_box(m), black_box(o));
                        black_box(result)
                    })
                },
            );
        }
    }
    group.finish();
}

// ===========================================================================
// MILP
// ===========================================================================

fn bench_knapsack(c: &mut Criterion) {
    let mut group = c.benchmark_group("knapsack");
    group.sample_size(10);

    for &items in &[10, 20, 30] {
        let model = random_knapsack(items, 7).unwrap();
        let options = SolveOptions::default();
        group.bench_with_input(BenchmarkId::from_parameter(items), &(model, options), |b, (m, o)| {
            b.iter(|| {
                let result = solve(black_box(m), black_box(o));
                black_box(result)
            })
        });
    }
    group.finish();
}

fn bench_bound_tightening(c: &mut Criterion) {
    let mut group = c.benchmark_group("integer_model");
    group.sample_size(10);

    let model = random_integer_model(8, 6, 10, 3).unwrap();
    for enabled in [true, false] {
        let options = SolveOptions::default().with_bound_tightening(enabled);
        group.bench_with_input(
            BenchmarkId::new("tightening", enabled),
            &(model.clone(), options),
            |b, (m, o)| {
                b.iter(|| {
                    let result = solve(black_box(m), black_box(o));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    group.sample_size(10);

    let models: Vec<_> = (0..32).map(|seed| random_knapsack(15, seed).unwrap()).collect();
    let options = SolveOptions::default();
    group.bench_function("knapsack_x32", |b| {
        b.iter(|| {
            let results = solve_batch(black_box(&models), black_box(&options));
            black_box(results)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_simplex, bench_knapsack, bench_bound_tightening, bench_batch);
criterion_main!(benches);
