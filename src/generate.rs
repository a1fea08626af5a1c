//! Seeded random instances for benchmarks and randomized tests.
//!
//! Every generator is deterministic in its seed. Coefficients are small
//! integers so that brute-force checks are exact.

use crate::error::ValidationError;
use crate::model::{Comparator, LinearExpr, Model, Sense, VarId, Variable};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A feasible, bounded maximization LP.
///
/// All rows are `<=` with positive coefficients and right-hand sides, so
/// the origin is feasible and every variable is capped by every row.
pub fn random_lp(vars: usize, constraints: usize, seed: u64) -> Result<Model, ValidationError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut model = Model::new(format!("lp_{vars}x{constraints}_{seed}"), Sense::Maximize);
    let ids = add_variables(&mut model, vars, Variable::new)?;

    let objective = LinearExpr::from_terms(ids.iter().map(|&id| (id, rng.random_range(1..=20) as f64)));
    model.set_objective(objective)?;

    for i in 0..constraints {
        let lhs = LinearExpr::from_terms(ids.iter().map(|&id| (id, rng.random_range(1..=10) as f64)));
        let rhs = rng.random_range(10..=100) as f64 * vars.max(1) as f64;
        model.add_constraint(format!("r{i}"), lhs, Comparator::Le, rhs)?;
    }
    Ok(model)
}

/// A feasible, bounded LP exercising every standard-form path.
///
/// Variables are boxed, bounded below only, bounded above only or free;
/// rows mix `<=`, `>=` and `=` with expression constants and right-hand
/// sides of either sign; the sense is random. Rows are built around a
/// random integer reference point so the model is feasible, and each
/// half-open or free variable gets `cap_*` / `floor_*` rows so it is
/// bounded.
pub fn random_general_lp(vars: usize, constraints: usize, seed: u64) -> Result<Model, ValidationError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let sense = if rng.random_bool(0.5) {
        Sense::Minimize
    } else {
        Sense::Maximize
    };
    let mut model = Model::new(format!("general_{vars}x{constraints}_{seed}"), sense);

    let mut ids = Vec::with_capacity(vars);
    let mut reference = Vec::with_capacity(vars);
    for j in 0..vars {
        let lower = rng.random_range(-5..=5) as f64;
        let width = rng.random_range(1..=6) as f64;
        let (var, point) = match rng.random_range(0..4) {
            0 => {
                let point = lower + rng.random_range(0..=width as i32) as f64;
                (Variable::new(format!("x{j}")).with_bounds(lower, lower + width), point)
            }
            1 => (Variable::new(format!("x{j}")).with_lower(lower), lower + rng.random_range(0..=3) as f64),
            2 => (
                Variable::new(format!("x{j}")).with_bounds(f64::NEG_INFINITY, lower),
                lower - rng.random_range(0..=3) as f64,
            ),
            _ => (Variable::new(format!("x{j}")).free(), lower),
        };
        let has_lower = var.lower().is_finite();
        let has_upper = var.upper().is_finite();
        let id = model.add_variable(var)?;
        if !has_upper {
            let cap = point + rng.random_range(0..=4) as f64;
            model.add_constraint(format!("cap_{j}"), LinearExpr::new().term(id, 1.0), Comparator::Le, cap)?;
        }
        if !has_lower {
            let floor = point - rng.random_range(0..=4) as f64;
            model.add_constraint(format!("floor_{j}"), LinearExpr::new().term(id, 1.0), Comparator::Ge, floor)?;
        }
        ids.push(id);
        reference.push(point);
    }

    let objective = LinearExpr::from_terms(ids.iter().map(|&id| (id, rng.random_range(-6..=6) as f64)))
        .constant(rng.random_range(-10..=10) as f64);
    model.set_objective(objective)?;

    for i in 0..constraints {
        let lhs = LinearExpr::from_terms(ids.iter().map(|&id| (id, rng.random_range(-4..=4) as f64)))
            .constant(rng.random_range(-3..=3) as f64);
        let activity = lhs.evaluate(&reference);
        let slack = rng.random_range(0..=5) as f64;
        let (cmp, rhs) = match rng.random_range(0..5) {
            0 | 1 => (Comparator::Le, activity + slack),
            2 | 3 => (Comparator::Ge, activity - slack),
            _ => (Comparator::Eq, activity),
        };
        model.add_constraint(format!("r{i}"), lhs, cmp, rhs)?;
    }
    Ok(model)
}

/// A 0-1 knapsack with capacity half the total weight.
pub fn random_knapsack(items: usize, seed: u64) -> Result<Model, ValidationError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut model = Model::new(format!("knapsack_{items}_{seed}"), Sense::Maximize);
    let ids = add_variables(&mut model, items, Variable::binary)?;

    let weights: Vec<f64> = ids.iter().map(|_| rng.random_range(1..=30) as f64).collect();
    let values: Vec<f64> = ids.iter().map(|_| rng.random_range(1..=40) as f64).collect();
    let capacity = (weights.iter().sum::<f64>() / 2.0).floor();

    model.set_objective(LinearExpr::from_terms(ids.iter().copied().zip(values)))?;
    model.add_constraint(
        "capacity",
        LinearExpr::from_terms(ids.iter().copied().zip(weights)),
        Comparator::Le,
        capacity,
    )?;
    Ok(model)
}

/// A pure integer maximization model over `[0, max_bound]` domains.
///
/// Coefficients may be negative, but every right-hand side is
/// non-negative so the origin is always feasible. Small `max_bound` and
/// `vars` keep the model enumerable.
pub fn random_integer_model(
    vars: usize,
    constraints: usize,
    max_bound: u32,
    seed: u64,
) -> Result<Model, ValidationError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut model = Model::new(format!("int_{vars}x{constraints}_{seed}"), Sense::Maximize);
    let ub = f64::from(max_bound);
    let ids = add_variables(&mut model, vars, |name| Variable::new(name).with_upper(ub).integer())?;

    let objective = LinearExpr::from_terms(ids.iter().map(|&id| (id, rng.random_range(-5..=10) as f64)));
    model.set_objective(objective)?;

    for i in 0..constraints {
        let lhs = LinearExpr::from_terms(ids.iter().map(|&id| (id, rng.random_range(-3..=8) as f64)));
        let rhs = rng.random_range(0..=(4 * max_bound as usize * vars.max(1))) as f64;
        model.add_constraint(format!("r{i}"), lhs, Comparator::Le, rhs)?;
    }
    Ok(model)
}

fn add_variables(
    model: &mut Model,
    n: usize,
    make: impl Fn(String) -> Variable,
) -> Result<Vec<VarId>, ValidationError> {
    (0..n).map(|j| model.add_variable(make(format!("x{j}")))).collect()
}
