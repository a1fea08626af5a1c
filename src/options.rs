//! Solve options.

use crate::numeric::{DEFAULT_INTEGRALITY_TOLERANCE, DEFAULT_TOLERANCE};

/// Entering/leaving variable selection rule of the simplex engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PivotRule {
    /// Most negative reduced cost.
    ///
    /// Falls back to Bland's rule after `stall_threshold` consecutive
    /// non-improving pivots, and returns to Dantzig once the objective
    /// moves again.
    #[default]
    Dantzig,

    /// Bland's rule from the first pivot: lowest-index improving column,
    /// ratio ties broken by the lowest basic-column index. Never cycles.
    Bland,
}

/// Options for a single solve call.
///
/// Passed explicitly into every call; nothing is held in global state.
///
/// # Examples
///
/// ```
/// use u_linprog::options::{PivotRule, SolveOptions};
///
/// let options = SolveOptions::default()
///     .with_tolerance(1e-8)
///     .with_max_nodes(500)
///     .with_time_limit_ms(2_000)
///     .with_pivot_rule(PivotRule::Bland);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolveOptions {
    /// Epsilon for every zero comparison in the engine.
    pub tolerance: f64,

    /// Distance from the nearest integer accepted as integral.
    pub integrality_tolerance: f64,

    /// Pivot budget per LP solve, Phase I and Phase II combined.
    pub max_iterations: usize,

    /// Soft branch-and-cut node budget.
    pub max_nodes: usize,

    /// Soft wall-clock limit in milliseconds, polled at every pivot and
    /// every node.
    pub time_limit_ms: Option<u64>,

    /// Pivot selection rule.
    pub pivot_rule: PivotRule,

    /// Consecutive non-improving pivots tolerated before switching to
    /// Bland's rule.
    pub stall_threshold: usize,

    /// Run bound propagation at each branch-and-cut node.
    pub bound_tightening: bool,

    /// Report duals and reduced costs for LP solutions.
    pub return_duals: bool,

    /// Route the whole call to the configured external solver.
    pub use_external: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            integrality_tolerance: DEFAULT_INTEGRALITY_TOLERANCE,
            max_iterations: 10_000,
            max_nodes: 10_000,
            time_limit_ms: None,
            pivot_rule: PivotRule::default(),
            stall_threshold: 10,
            bound_tightening: true,
            return_duals: true,
            use_external: false,
        }
    }
}

impl SolveOptions {
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn with_integrality_tolerance(mut self, tol: f64) -> Self {
        self.integrality_tolerance = tol;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_max_nodes(mut self, n: usize) -> Self {
        self.max_nodes = n;
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    pub fn with_pivot_rule(mut self, rule: PivotRule) -> Self {
        self.pivot_rule = rule;
        self
    }

    pub fn with_stall_threshold(mut self, n: usize) -> Self {
        self.stall_threshold = n;
        self
    }

    pub fn with_bound_tightening(mut self, enabled: bool) -> Self {
        self.bound_tightening = enabled;
        self
    }

    pub fn with_return_duals(mut self, enabled: bool) -> Self {
        self.return_duals = enabled;
        self
    }

    pub fn with_external(mut self, enabled: bool) -> Self {
        self.use_external = enabled;
        self
    }

    /// Validates the options.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(format!("tolerance must be positive and finite, got {}", self.tolerance));
        }
        if !(self.integrality_tolerance.is_finite()
            && self.integrality_tolerance > 0.0
            && self.integrality_tolerance < 0.5)
        {
            return Err(format!(
                "integrality_tolerance must be in (0, 0.5), got {}",
                self.integrality_tolerance
            ));
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".into());
        }
        if self.max_nodes == 0 {
            return Err("max_nodes must be at least 1".into());
        }
        if self.time_limit_ms == Some(0) {
            return Err("time_limit_ms must be positive when set".into());
        }
        if self.stall_threshold == 0 {
            return Err("stall_threshold must be at least 1".into());
        }
        Ok(())
    }
}
