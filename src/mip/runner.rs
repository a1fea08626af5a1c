//! Depth-first branch-and-cut driver.

use super::propagate::{BoundPropagator, Propagation};
use super::types::{BranchDirection, BranchNode, NodeOutcome};
use crate::deadline::Deadline;
use crate::error::{SolveError, SolveResult};
use crate::lp::{LpStatus, SimplexRunner, StandardForm};
use crate::model::Model;
use crate::numeric::{fractionality, snap_zero};
use crate::options::SolveOptions;
use crate::solution::{Solution, SolveStats, SolveStatus};
use log::{debug, trace, warn};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Best integral point found so far, with its objective in minimization
/// form.
#[derive(Debug, Clone)]
struct Incumbent {
    values: Vec<f64>,
    bound: f64,
}

/// Why the search stopped before the stack emptied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    NodeLimit,
    Deadline,
    Cancelled,
}

/// Branch-and-cut over LP relaxations.
///
/// Nodes live on an explicit stack and are explored depth-first, the
/// floor child before the ceiling child. Each node is tightened by bound
/// propagation, solved with [`SimplexRunner`], then closed as infeasible,
/// pruned by bound, accepted as integral or branched on its most
/// fractional integer variable.
pub struct BranchAndCut;

impl BranchAndCut {
    /// Solves `model`, honouring integrality flags.
    pub fn run(model: &Model, options: &SolveOptions) -> SolveResult<Solution> {
        Self::run_with_cancel(model, options, None)
    }

    /// Solves `model` with an optional cancellation token.
    pub fn run_with_cancel(
        model: &Model,
        options: &SolveOptions,
        cancel: Option<Arc<AtomicBool>>,
    ) -> SolveResult<Solution> {
        options.validate().map_err(SolveError::InvalidOptions)?;
        let deadline = Deadline::new(options.time_limit_ms, cancel);
        Self::run_with_deadline(model, options, &deadline)
    }

    pub(crate) fn run_with_deadline(
        model: &Model,
        options: &SolveOptions,
        deadline: &Deadline,
    ) -> SolveResult<Solution> {
        model.validate()?;
        if !model.has_integers() {
            return SimplexRunner::solve_with_deadline(model, &model.bounds(), options, deadline);
        }
        Search::new(model, options, deadline).run()
    }
}

struct Search<'a> {
    model: &'a Model,
    options: &'a SolveOptions,
    deadline: &'a Deadline,
    propagator: BoundPropagator<'a>,
    sense: f64,
    incumbent: Option<Incumbent>,
    stats: SolveStats,
    next_id: usize,
    abandoned: usize,
}

impl<'a> Search<'a> {
    fn new(model: &'a Model, options: &'a SolveOptions, deadline: &'a Deadline) -> Self {
        Self {
            model,
            options,
            deadline,
            propagator: BoundPropagator::new(model, options.tolerance, options.integrality_tolerance),
            sense: model.sense().factor(),
            incumbent: None,
            stats: SolveStats::default(),
            next_id: 1,
            abandoned: 0,
        }
    }

    fn run(mut self) -> SolveResult<Solution> {
        let mut stack = vec![BranchNode::root(self.model.bounds())];
        let mut stop = None;

        while let Some(node) = stack.pop() {
            if self.deadline.is_cancelled() {
                stop = Some(StopReason::Cancelled);
                break;
            }
            if self.deadline.is_expired() {
                stop = Some(StopReason::Deadline);
                break;
            }
            if self.stats.nodes_explored >= self.options.max_nodes {
                stop = Some(StopReason::NodeLimit);
                break;
            }
            self.stats.nodes_explored += 1;
            self.stats.max_depth = self.stats.max_depth.max(node.depth);

            let outcome = match self.process(node, &mut stack)? {
                Some(outcome) => outcome,
                None => {
                    return Ok(self.finish_unbounded());
                }
            };
            if outcome == NodeOutcome::Abandoned && self.deadline.is_expired() {
                stop = Some(if self.deadline.is_cancelled() {
                    StopReason::Cancelled
                } else {
                    StopReason::Deadline
                });
                break;
            }
        }

        Ok(self.finish(stop))
    }

    /// Closes one node. `None` means its relaxation is unbounded.
    fn process(
        &mut self,
        mut node: BranchNode,
        stack: &mut Vec<BranchNode>,
    ) -> SolveResult<Option<NodeOutcome>> {
        if self.cannot_improve(node.lp_bound) {
            trace!("node {} pruned by parent bound {}", node.id, node.lp_bound);
            return Ok(Some(NodeOutcome::PrunedByBound));
        }

        if self.options.bound_tightening {
            if let Propagation::Infeasible = self.propagator.propagate(&mut node.bounds) {
                trace!("node {} infeasible after propagation", node.id);
                return Ok(Some(NodeOutcome::Infeasible));
            }
        }

        let sf = StandardForm::build(self.model, &node.bounds)?;
        let lp = SimplexRunner::run(&sf, self.options, self.deadline)?;
        self.stats.iterations += lp.iterations;
        self.stats.phase_one_iterations += lp.phase_one_iterations;

        match lp.status {
            LpStatus::Optimal => {}
            LpStatus::Infeasible => {
                trace!("node {} relaxation infeasible", node.id);
                return Ok(Some(NodeOutcome::Infeasible));
            }
            LpStatus::Unbounded => {
                debug!("node {} relaxation unbounded", node.id);
                return Ok(None);
            }
            LpStatus::IterationLimit => {
                if !self.deadline.is_expired() {
                    warn!(
                        "node {} (depth {}) abandoned after {} pivots; search is no longer exhaustive",
                        node.id, node.depth, lp.iterations
                    );
                }
                self.abandoned += 1;
                return Ok(Some(NodeOutcome::Abandoned));
            }
        }

        let bound = self.sense * sf.recover_objective(lp.objective);
        if self.cannot_improve(bound) {
            trace!("node {} pruned: relaxation bound {bound}", node.id);
            return Ok(Some(NodeOutcome::PrunedByBound));
        }

        let values = sf.recover_values(&lp.column_values);
        match self.branching_variable(&values) {
            None => {
                self.accept(node.id, values);
                Ok(Some(NodeOutcome::Integral))
            }
            Some(var) => {
                let value = values[var];
                let up = node.child(self.next_id, var, value, BranchDirection::Up, bound);
                let down = node.child(self.next_id + 1, var, value, BranchDirection::Down, bound);
                self.next_id += 2;
                trace!(
                    "node {} branches on `{}` = {value} at depth {}",
                    node.id,
                    self.model.variables()[var].name(),
                    node.depth
                );
                // Down is pushed last so it is explored first.
                stack.extend(up);
                stack.extend(down);
                Ok(Some(NodeOutcome::Branched))
            }
        }
    }

    /// Whether a subtree with minimization-form bound `bound` can be
    /// discarded against the incumbent.
    fn cannot_improve(&self, bound: f64) -> bool {
        match &self.incumbent {
            Some(inc) => bound >= inc.bound - self.options.tolerance * (1.0 + inc.bound.abs()),
            None => false,
        }
    }

    /// Most fractional integer variable; lowest index on ties.
    fn branching_variable(&self, values: &[f64]) -> Option<usize> {
        let int_tol = self.options.integrality_tolerance;
        let mut best: Option<(usize, f64)> = None;
        for (j, var) in self.model.variables().iter().enumerate() {
            if !var.is_integer() {
                continue;
            }
            let frac = fractionality(values[j]);
            if frac <= int_tol {
                continue;
            }
            if best.is_none_or(|(_, f)| frac > f) {
                best = Some((j, frac));
            }
        }
        best.map(|(j, _)| j)
    }

    fn accept(&mut self, node_id: usize, mut values: Vec<f64>) {
        let tol = self.options.tolerance;
        for (value, var) in values.iter_mut().zip(self.model.variables()) {
            *value = if var.is_integer() {
                value.round()
            } else {
                snap_zero(*value, tol)
            };
        }
        let bound = self.sense * self.model.objective_value(&values);
        let improves = self
            .incumbent
            .as_ref()
            .is_none_or(|inc| bound < inc.bound - tol * (1.0 + inc.bound.abs()));
        if improves {
            debug!(
                "node {node_id}: new incumbent with objective {}",
                self.sense * bound
            );
            self.stats.incumbent_updates += 1;
            self.incumbent = Some(Incumbent { values, bound });
        }
    }

    fn finish_unbounded(mut self) -> Solution {
        self.stats.solve_time_ms = self.deadline.elapsed_ms();
        let mut solution = Solution::empty(SolveStatus::Unbounded)
            .with_message("LP relaxation is unbounded; the integer program is unbounded");
        solution.stats = self.stats;
        solution
    }

    fn finish(mut self, stop: Option<StopReason>) -> Solution {
        self.stats.solve_time_ms = self.deadline.elapsed_ms();
        let exhaustive = stop.is_none() && self.abandoned == 0;
        let nodes = self.stats.nodes_explored;

        let reason = match stop {
            Some(StopReason::NodeLimit) => format!("node limit of {} reached", self.options.max_nodes),
            Some(StopReason::Deadline) => "time limit reached".to_string(),
            Some(StopReason::Cancelled) => "search cancelled".to_string(),
            None if self.abandoned > 0 => format!("{} nodes abandoned on the pivot budget", self.abandoned),
            None => format!("explored {nodes} nodes"),
        };
        debug!(
            "branch-and-cut finished: {reason}; {nodes} nodes, {} pivots, {} incumbent updates",
            self.stats.iterations, self.stats.incumbent_updates
        );

        let mut solution = match self.incumbent.take() {
            Some(inc) => {
                let status = if exhaustive {
                    SolveStatus::Optimal
                } else {
                    SolveStatus::NodeLimitReached
                };
                let mut solution = Solution::empty(status);
                solution.objective_value = Some(self.sense * inc.bound);
                for (var, value) in self.model.variables().iter().zip(inc.values) {
                    solution.variables.insert(var.name().to_string(), value);
                }
                solution.with_message(reason)
            }
            None if exhaustive => Solution::empty(SolveStatus::Infeasible)
                .with_message(format!("no integral point exists; {reason}")),
            None => Solution::empty(SolveStatus::NodeLimitReached)
                .with_message(format!("no integral point found yet; {reason}")),
        };
        solution.stats = self.stats;
        solution
    }
}
