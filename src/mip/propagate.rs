//! Activity-based bound propagation.

use crate::model::{Bounds, Comparator, Model};
use crate::numeric::is_zero;

/// Counters of one propagation call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationStats {
    /// Passes over the constraint list.
    pub rounds: usize,
    /// Individual bound changes applied.
    pub tightenings: usize,
}

/// Result of [`BoundPropagator::propagate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Bounds are consistent (possibly tightened).
    Feasible(PropagationStats),
    /// Some domain became empty or a constraint cannot be met.
    Infeasible,
}

impl Propagation {
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Propagation::Infeasible)
    }
}

/// Tightens variable bounds from the model's linear constraints.
///
/// For `sum a_j x_j <= r`, the minimum activity of all other terms bounds
/// each `a_j x_j` from above; `>=` rows are handled on the negated row and
/// equalities both ways. Integer bounds are rounded inward only past the
/// integrality tolerance and continuous bounds are relaxed by the numeric
/// tolerance, so no feasible integral point is ever cut off.
#[derive(Debug, Clone)]
pub struct BoundPropagator<'a> {
    model: &'a Model,
    tol: f64,
    int_tol: f64,
    max_rounds: usize,
}

impl<'a> BoundPropagator<'a> {
    pub fn new(model: &'a Model, tol: f64, int_tol: f64) -> Self {
        Self {
            model,
            tol,
            int_tol,
            max_rounds: 20,
        }
    }

    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Propagates until a fixpoint or the round limit.
    pub fn propagate(&self, bounds: &mut [Bounds]) -> Propagation {
        let mut stats = PropagationStats::default();
        if bounds.iter().any(|b| b.lower > b.upper + self.tol) {
            return Propagation::Infeasible;
        }

        while stats.rounds < self.max_rounds {
            stats.rounds += 1;
            let mut changed = 0;
            for con in self.model.constraints() {
                let rhs = con.rhs() - con.lhs().constant_term();
                let terms = con.lhs().terms();
                if matches!(con.comparator(), Comparator::Le | Comparator::Eq) {
                    match self.tighten_row(terms.iter().map(|&(v, a)| (v.index(), a)), rhs, bounds) {
                        Some(n) => changed += n,
                        None => return Propagation::Infeasible,
                    }
                }
                if matches!(con.comparator(), Comparator::Ge | Comparator::Eq) {
                    match self.tighten_row(terms.iter().map(|&(v, a)| (v.index(), -a)), -rhs, bounds) {
                        Some(n) => changed += n,
                        None => return Propagation::Infeasible,
                    }
                }
            }
            stats.tightenings += changed;
            if changed == 0 {
                break;
            }
        }
        Propagation::Feasible(stats)
    }

    /// One pass of `sum a_j x_j <= rhs`. Returns the number of bound
    /// changes, or `None` if the row or a domain is infeasible.
    fn tighten_row<I>(&self, terms: I, rhs: f64, bounds: &mut [Bounds]) -> Option<usize>
    where
        I: Iterator<Item = (usize, f64)> + Clone,
    {
        let mut finite_sum = 0.0;
        let mut infinite = 0usize;
        for (j, a) in terms.clone() {
            let c = min_contribution(a, bounds[j]);
            if c.is_finite() {
                finite_sum += c;
            } else {
                infinite += 1;
            }
        }

        let scale = 1.0 + rhs.abs();
        if infinite == 0 && finite_sum > rhs + self.tol * scale.max(finite_sum.abs()) {
            return None;
        }
        if infinite > 1 {
            return Some(0);
        }

        let mut changed = 0;
        for (j, a) in terms {
            if is_zero(a, self.tol) {
                continue;
            }
            let c = min_contribution(a, bounds[j]);
            let residual = match (infinite, c.is_finite()) {
                (0, _) => finite_sum - c,
                (1, false) => finite_sum,
                _ => continue,
            };
            let limit = (rhs - residual) / a;
            if !limit.is_finite() {
                continue;
            }
            let integer = self.model.variables()[j].is_integer();
            let b = &mut bounds[j];
            if a > 0.0 {
                let upper = if integer {
                    (limit + self.int_tol).floor()
                } else {
                    limit + self.tol * (1.0 + limit.abs())
                };
                if upper < b.upper - self.tol * (1.0 + upper.abs()) {
                    b.upper = upper;
                    changed += 1;
                }
            } else {
                let lower = if integer {
                    (limit - self.int_tol).ceil()
                } else {
                    limit - self.tol * (1.0 + limit.abs())
                };
                if lower > b.lower + self.tol * (1.0 + lower.abs()) {
                    b.lower = lower;
                    changed += 1;
                }
            }
            if b.lower > b.upper {
                if b.lower > b.upper + self.tol * (1.0 + b.upper.abs()) {
                    return None;
                }
                b.lower = b.upper;
            }
        }
        Some(changed)
    }
}

/// Smallest value of `a * x` over `x` in `b`.
fn min_contribution(a: f64, b: Bounds) -> f64 {
    if a > 0.0 {
        a * b.lower
    } else {
        a * b.upper
    }
}
