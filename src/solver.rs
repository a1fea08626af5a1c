//! Solver interface and the engine entry points.

use crate::deadline::Deadline;
use crate::error::{SolveError, SolveResult};
use crate::mip::BranchAndCut;
use crate::model::Model;
use crate::options::SolveOptions;
use crate::solution::{Solution, SolveStatus};
use log::{debug, warn};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Trait for LP/MILP solver implementations.
///
/// The built-in branch-and-cut search and external adapters share this
/// contract: a validated model and explicit options in, a [`Solution`]
/// out. Implementations hold no per-call state, so one instance may serve
/// concurrent calls.
pub trait Solver: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Solves the model and returns a solution.
    fn solve(&self, model: &Model, options: &SolveOptions) -> SolveResult<Solution>;
}

/// The built-in engine: simplex for pure LPs, branch-and-cut otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchAndCutSolver;

impl BranchAndCutSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Solver for BranchAndCutSolver {
    fn name(&self) -> &str {
        "branch-and-cut"
    }

    fn solve(&self, model: &Model, options: &SolveOptions) -> SolveResult<Solution> {
        BranchAndCut::run(model, options)
    }
}

/// Dispatches a solve call to the built-in search or, when
/// [`SolveOptions::use_external`] is set, to the configured external
/// solver.
///
/// # Examples
///
/// ```
/// use u_linprog::model::{Comparator, LinearExpr, Model, Sense, Variable};
/// use u_linprog::options::SolveOptions;
/// use u_linprog::solution::SolveStatus;
/// use u_linprog::solver::Engine;
///
/// let mut model = Model::new("pair", Sense::Maximize);
/// let x = model.add_variable(Variable::new("x").integer()).unwrap();
/// let y = model.add_variable(Variable::new("y").integer()).unwrap();
/// model.set_objective(LinearExpr::new().term(x, 1.0).term(y, 1.0)).unwrap();
/// model
///     .add_constraint("cap", LinearExpr::new().term(x, 1.0).term(y, 1.0), Comparator::Le, 10.0)
///     .unwrap();
///
/// let solution = Engine::new().solve(&model, &SolveOptions::default()).unwrap();
/// assert_eq!(solution.status, SolveStatus::Optimal);
/// assert_eq!(solution.objective_value, Some(10.0));
/// ```
pub struct Engine {
    builtin: BranchAndCutSolver,
    external: Option<Box<dyn Solver>>,
}

impl Engine {
    /// Engine with the default external solver, if one is compiled in.
    pub fn new() -> Self {
        Self {
            builtin: BranchAndCutSolver,
            external: default_external(),
        }
    }

    /// Engine delegating external requests to `external`.
    pub fn with_external(external: Box<dyn Solver>) -> Self {
        Self {
            builtin: BranchAndCutSolver,
            external: Some(external),
        }
    }

    /// Engine without any external solver.
    pub fn builtin_only() -> Self {
        Self {
            builtin: BranchAndCutSolver,
            external: None,
        }
    }

    /// Name of the configured external solver.
    pub fn external_name(&self) -> Option<&str> {
        self.external.as_deref().map(|s| s.name())
    }

    /// Solves `model`.
    pub fn solve(&self, model: &Model, options: &SolveOptions) -> SolveResult<Solution> {
        self.solve_with_cancel(model, options, None)
    }

    /// Solves `model` with an optional cancellation token.
    ///
    /// The external solver call is blocking: the deadline is checked
    /// before and after it, not during.
    pub fn solve_with_cancel(
        &self,
        model: &Model,
        options: &SolveOptions,
        cancel: Option<Arc<AtomicBool>>,
    ) -> SolveResult<Solution> {
        options.validate().map_err(SolveError::InvalidOptions)?;
        model.validate()?;
        let deadline = Deadline::new(options.time_limit_ms, cancel);

        if !options.use_external {
            debug!("solving `{}` with {}", model.name(), self.builtin.name());
            return BranchAndCut::run_with_deadline(model, options, &deadline);
        }

        let external = self.external.as_deref().ok_or_else(|| {
            SolveError::ExternalUnavailable("no external solver is configured".into())
        })?;
        if deadline.is_expired() {
            return Ok(Solution::empty(SolveStatus::NodeLimitReached)
                .with_message("deadline passed before the external solver was called"));
        }

        debug!("delegating `{}` to external solver {}", model.name(), external.name());
        let mut solution = external.solve(model, options)?;
        if deadline.is_expired() {
            warn!(
                "external solver {} returned after the time limit ({} ms elapsed)",
                external.name(),
                deadline.elapsed_ms()
            );
        }
        solution.stats.solve_time_ms = deadline.elapsed_ms();
        Ok(solution)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "microlp")]
fn default_external() -> Option<Box<dyn Solver>> {
    Some(Box::new(crate::external::MicrolpSolver::new()))
}

#[cfg(not(feature = "microlp"))]
fn default_external() -> Option<Box<dyn Solver>> {
    None
}

/// Solves `model` with a default [`Engine`].
pub fn solve(model: &Model, options: &SolveOptions) -> SolveResult<Solution> {
    Engine::new().solve(model, options)
}

/// Solves `model` with a default [`Engine`] and a cancellation token.
pub fn solve_with_cancel(
    model: &Model,
    options: &SolveOptions,
    cancel: Option<Arc<AtomicBool>>,
) -> SolveResult<Solution> {
    Engine::new().solve_with_cancel(model, options, cancel)
}
