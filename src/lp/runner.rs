//! Two-phase primal simplex loop.

use super::standard::StandardForm;
use super::tableau::Tableau;
use crate::deadline::Deadline;
use crate::error::{SolveError, SolveResult};
use crate::model::{Bounds, Model};
use crate::numeric::{is_negative, ratio_test, snap_zero, RatioCandidate, RatioTie};
use crate::options::{PivotRule, SolveOptions};
use crate::solution::{Solution, SolveStats, SolveStatus};
use log::{debug, trace};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Terminal state of one simplex solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LpStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// Pivot budget, time limit or cancellation hit before termination.
    IterationLimit,
}

/// Result of a simplex solve on a [`StandardForm`].
#[derive(Debug, Clone)]
pub struct SimplexResult {
    /// Terminal state.
    pub status: LpStatus,

    /// Value of every standard-form column (meaningful when optimal).
    pub column_values: Vec<f64>,

    /// Internal (minimization) objective value.
    pub objective: f64,

    /// Final Phase II reduced-cost row.
    pub reduced_costs: Vec<f64>,

    /// Pivots over both phases.
    pub iterations: usize,

    /// Pivots spent in Phase I.
    pub phase_one_iterations: usize,

    /// Number of switches from Dantzig pricing to Bland's rule.
    pub bland_switches: usize,
}

impl SimplexResult {
    fn terminal(status: LpStatus, iterations: usize, phase_one_iterations: usize, bland_switches: usize) -> Self {
        Self {
            status,
            column_values: Vec::new(),
            objective: 0.0,
            reduced_costs: Vec::new(),
            iterations,
            phase_one_iterations,
            bland_switches,
        }
    }
}

enum PhaseOutcome {
    Optimal,
    Unbounded,
    Limit,
}

/// Pivoting state shared by both phases.
struct PivotLoop<'a> {
    sf: &'a StandardForm,
    options: &'a SolveOptions,
    deadline: &'a Deadline,
    iterations: usize,
    bland_switches: usize,
}

impl PivotLoop<'_> {
    fn run_phase(&mut self, t: &mut Tableau, allow_artificials: bool) -> SolveResult<PhaseOutcome> {
        let tol = self.options.tolerance;
        let forced_bland = self.options.pivot_rule == PivotRule::Bland;
        let mut bland = forced_bland;
        let mut stall = 0usize;

        loop {
            let entering = match self.entering(t, allow_artificials, bland) {
                Some(col) => col,
                None => return Ok(PhaseOutcome::Optimal),
            };

            if self.iterations >= self.options.max_iterations || self.deadline.is_expired() {
                return Ok(PhaseOutcome::Limit);
            }

            let tie = if bland {
                RatioTie::LowestBasicColumn
            } else {
                RatioTie::LowestRow
            };
            let candidates = (0..t.num_rows()).map(|i| RatioCandidate {
                row: i,
                pivot: t.entry(i, entering),
                rhs: t.rhs()[i],
                basic_column: t.basis()[i],
            });
            let leaving = match ratio_test(candidates, tol, tie) {
                Some(row) => row,
                None => return Ok(PhaseOutcome::Unbounded),
            };

            trace!(
                "pivot {}: column {} enters, column {} leaves (row {})",
                self.iterations,
                entering,
                t.basis()[leaving],
                leaving
            );

            let before = t.objective();
            t.pivot(leaving, entering)?;
            self.iterations += 1;

            let improved = before - t.objective() > tol * (1.0 + before.abs());
            if improved {
                stall = 0;
                if bland && !forced_bland {
                    debug!("objective moved after {} pivots; resuming Dantzig pricing", self.iterations);
                    bland = false;
                }
            } else {
                stall += 1;
                if !bland && stall > self.options.stall_threshold {
                    debug!(
                        "objective stalled for {stall} pivots at {before}; switching to Bland's rule"
                    );
                    bland = true;
                    self.bland_switches += 1;
                }
            }
        }
    }

    /// Entering column: most negative reduced cost (lowest index on ties),
    /// or the lowest-index negative one under Bland's rule.
    fn entering(&self, t: &Tableau, allow_artificials: bool, bland: bool) -> Option<usize> {
        let tol = self.options.tolerance;
        let mut candidates = t
            .reduced_costs()
            .iter()
            .enumerate()
            .filter(|&(j, _)| allow_artificials || !self.sf.is_artificial(j))
            .filter(|&(_, &d)| is_negative(d, tol));

        if bland {
            return candidates.next().map(|(j, _)| j);
        }
        candidates
            .fold(None, |best: Option<(usize, f64)>, (j, &d)| match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((j, d)),
            })
            .map(|(j, _)| j)
    }

    /// Pivots basic artificials out of the basis after Phase I.
    ///
    /// A row whose non-artificial entries are all zero is redundant; its
    /// artificial stays basic at zero and can never move again.
    fn drive_out_artificials(&mut self, t: &mut Tableau) -> SolveResult<()> {
        let tol = self.options.tolerance;
        for row in 0..t.num_rows() {
            if !self.sf.is_artificial(t.basis()[row]) {
                continue;
            }
            let replacement = (0..self.sf.first_artificial)
                .filter(|&j| t.entry(row, j).abs() > tol)
                .max_by(|&a, &b| t.entry(row, a).abs().total_cmp(&t.entry(row, b).abs()));
            match replacement {
                Some(col) => {
                    trace!("driving artificial out of row {row} with column {col}");
                    t.pivot(row, col)?;
                }
                None => debug!("row {row} is redundant; artificial stays basic at zero"),
            }
        }
        Ok(())
    }
}

/// Two-phase primal simplex.
pub struct SimplexRunner;

impl SimplexRunner {
    /// Solves a standard form.
    ///
    /// Phase I minimizes the sum of artificials from the identity basis; a
    /// positive optimum (beyond `tolerance * (1 + max|b|)`) proves the
    /// problem infeasible. Phase II then optimizes the true costs with
    /// artificials barred from entering.
    pub fn run(sf: &StandardForm, options: &SolveOptions, deadline: &Deadline) -> SolveResult<SimplexResult> {
        let tol = options.tolerance;
        let mut t = Tableau::new(sf, tol);
        let mut pivots = PivotLoop {
            sf,
            options,
            deadline,
            iterations: 0,
            bland_switches: 0,
        };

        let mut phase_one_iterations = 0;
        if sf.has_artificials() {
            t.set_costs(&sf.phase_one_costs());
            let outcome = pivots.run_phase(&mut t, true)?;
            phase_one_iterations = pivots.iterations;
            match outcome {
                PhaseOutcome::Optimal => {}
                PhaseOutcome::Limit => {
                    return Ok(SimplexResult::terminal(
                        LpStatus::IterationLimit,
                        pivots.iterations,
                        phase_one_iterations,
                        pivots.bland_switches,
                    ));
                }
                PhaseOutcome::Unbounded => {
                    return Err(SolveError::Numerical(
                        "phase one reported an unbounded sum of artificials".into(),
                    ));
                }
            }

            let scale = 1.0 + sf.b.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
            let infeasibility = t.objective();
            debug!("phase one finished after {phase_one_iterations} pivots, infeasibility {infeasibility:e}");
            if infeasibility > tol * scale {
                return Ok(SimplexResult::terminal(
                    LpStatus::Infeasible,
                    pivots.iterations,
                    phase_one_iterations,
                    pivots.bland_switches,
                ));
            }
            pivots.drive_out_artificials(&mut t)?;
        }

        t.set_costs(&sf.c);
        let outcome = pivots.run_phase(&mut t, false)?;
        let status = match outcome {
            PhaseOutcome::Optimal => LpStatus::Optimal,
            PhaseOutcome::Unbounded => LpStatus::Unbounded,
            PhaseOutcome::Limit => LpStatus::IterationLimit,
        };
        debug!(
            "simplex finished: {:?} after {} pivots ({} in phase one)",
            status, pivots.iterations, phase_one_iterations
        );
        if status != LpStatus::Optimal {
            return Ok(SimplexResult::terminal(
                status,
                pivots.iterations,
                phase_one_iterations,
                pivots.bland_switches,
            ));
        }

        Ok(SimplexResult {
            status,
            column_values: t.column_values(),
            objective: t.objective(),
            reduced_costs: t.reduced_costs().to_vec(),
            iterations: pivots.iterations,
            phase_one_iterations,
            bland_switches: pivots.bland_switches,
        })
    }

    /// Solves the LP relaxation of `model` (integrality flags are ignored).
    pub fn solve(model: &Model, options: &SolveOptions) -> SolveResult<Solution> {
        Self::solve_with_cancel(model, options, None)
    }

    /// Solves the LP relaxation with an optional cancellation token.
    pub fn solve_with_cancel(
        model: &Model,
        options: &SolveOptions,
        cancel: Option<Arc<AtomicBool>>,
    ) -> SolveResult<Solution> {
        options.validate().map_err(SolveError::InvalidOptions)?;
        let deadline = Deadline::new(options.time_limit_ms, cancel);
        Self::solve_with_deadline(model, &model.bounds(), options, &deadline)
    }

    /// Solves the LP relaxation under explicit bounds and a running deadline.
    pub(crate) fn solve_with_deadline(
        model: &Model,
        bounds: &[Bounds],
        options: &SolveOptions,
        deadline: &Deadline,
    ) -> SolveResult<Solution> {
        let sf = StandardForm::build(model, bounds)?;
        let result = Self::run(&sf, options, deadline)?;
        let mut solution = lp_solution(model, &sf, &result, options);
        solution.stats.solve_time_ms = deadline.elapsed_ms();
        Ok(solution)
    }
}

/// Translates a simplex result back into model terms.
fn lp_solution(
    model: &Model,
    sf: &StandardForm,
    result: &SimplexResult,
    options: &SolveOptions,
) -> Solution {
    let stats = SolveStats {
        iterations: result.iterations,
        phase_one_iterations: result.phase_one_iterations,
        ..SolveStats::default()
    };
    let (status, message) = match result.status {
        LpStatus::Optimal => (SolveStatus::Optimal, format!("optimal after {} pivots", result.iterations)),
        LpStatus::Infeasible => (SolveStatus::Infeasible, "no feasible point exists".to_string()),
        LpStatus::Unbounded => (SolveStatus::Unbounded, "objective is unbounded".to_string()),
        LpStatus::IterationLimit => (
            SolveStatus::IterationLimitReached,
            format!("stopped after {} pivots without reaching optimality", result.iterations),
        ),
    };
    let mut solution = Solution::empty(status).with_message(message);
    solution.stats = stats;
    if status != SolveStatus::Optimal {
        return solution;
    }

    let tol = options.tolerance;
    let values = sf.recover_values(&result.column_values);
    for (var, &value) in model.variables().iter().zip(&values) {
        solution.variables.insert(var.name().to_string(), snap_zero(value, tol));
    }
    solution.objective_value = Some(sf.recover_objective(result.objective));

    if options.return_duals {
        let reduced = sf.recover_reduced_costs(&result.reduced_costs);
        for (var, &rc) in model.variables().iter().zip(&reduced) {
            solution.reduced_costs.insert(var.name().to_string(), snap_zero(rc, tol));
        }
        let duals = sf.recover_duals(&result.reduced_costs);
        for (con, &y) in model.constraints().iter().zip(&duals) {
            solution.duals.insert(con.name().to_string(), snap_zero(y, tol));
        }
    }
    solution
}
