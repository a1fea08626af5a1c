//! Adapter for the pure-Rust `microlp` solver.

use crate::error::{SolveError, SolveResult};
use crate::model::{Comparator, Model, Sense};
use crate::options::SolveOptions;
use crate::solution::{Solution, SolveStatus};
use crate::solver::Solver;
use log::debug;
use microlp::{ComparisonOp, OptimizationDirection, Problem};

/// Delegates the whole model to `microlp`.
///
/// `microlp` reports neither duals nor search counters, so the returned
/// solution carries values and the objective only. Integer bounds are
/// clamped to the `i32` range it accepts.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicrolpSolver;

impl MicrolpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Solver for MicrolpSolver {
    fn name(&self) -> &str {
        "microlp"
    }

    fn solve(&self, model: &Model, _options: &SolveOptions) -> SolveResult<Solution> {
        model.validate()?;

        let direction = match model.sense() {
            Sense::Minimize => OptimizationDirection::Minimize,
            Sense::Maximize => OptimizationDirection::Maximize,
        };
        let mut problem = Problem::new(direction);
        let objective = &model.objective().expr;

        let vars: Vec<microlp::Variable> = model
            .variables()
            .iter()
            .map(|v| {
                let cost = objective.coefficient(v.id());
                if v.is_integer() {
                    problem.add_integer_var(cost, (integer_lower(v.lower()), integer_upper(v.upper())))
                } else {
                    problem.add_var(cost, (v.lower(), v.upper()))
                }
            })
            .collect();

        for con in model.constraints() {
            let lhs: Vec<(microlp::Variable, f64)> = con
                .lhs()
                .terms()
                .iter()
                .map(|&(var, coef)| (vars[var.index()], coef))
                .collect();
            let op = match con.comparator() {
                Comparator::Le => ComparisonOp::Le,
                Comparator::Ge => ComparisonOp::Ge,
                Comparator::Eq => ComparisonOp::Eq,
            };
            problem.add_constraint(lhs, op, con.rhs() - con.lhs().constant_term());
        }

        match problem.solve() {
            Ok(result) => {
                let values: Vec<f64> = model
                    .variables()
                    .iter()
                    .zip(&vars)
                    .map(|(var, &handle)| {
                        let value = *result.var_value(handle);
                        if var.is_integer() {
                            value.round()
                        } else {
                            value
                        }
                    })
                    .collect();
                let mut solution = Solution::empty(SolveStatus::Optimal).with_message("solved by microlp");
                solution.objective_value = Some(model.objective_value(&values));
                for (var, value) in model.variables().iter().zip(values) {
                    solution.variables.insert(var.name().to_string(), value);
                }
                Ok(solution)
            }
            Err(microlp::Error::Infeasible) => {
                debug!("microlp: `{}` is infeasible", model.name());
                Ok(Solution::empty(SolveStatus::Infeasible).with_message("microlp reported infeasibility"))
            }
            Err(microlp::Error::Unbounded) => {
                debug!("microlp: `{}` is unbounded", model.name());
                Ok(Solution::empty(SolveStatus::Unbounded).with_message("microlp reported an unbounded objective"))
            }
            Err(err) => Err(SolveError::External(err.to_string())),
        }
    }
}

fn integer_lower(v: f64) -> i32 {
    if v <= f64::from(i32::MIN) {
        i32::MIN
    } else {
        v.ceil().min(f64::from(i32::MAX)) as i32
    }
}

fn integer_upper(v: f64) -> i32 {
    if v >= f64::from(i32::MAX) {
        i32::MAX
    } else {
        v.floor().max(f64::from(i32::MIN)) as i32
    }
}
