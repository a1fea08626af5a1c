//! Solve results.

use std::collections::BTreeMap;
use std::fmt;

/// Outcome of a solve call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SolveStatus {
    /// Proven optimal solution found.
    Optimal,
    /// No point satisfies every constraint, bound and integrality flag.
    Infeasible,
    /// The objective improves without limit.
    Unbounded,
    /// Branch-and-cut stopped on its node budget, time limit, cancellation
    /// or an abandoned node. The incumbent, if any, is best-effort.
    NodeLimitReached,
    /// The simplex pivot budget or time limit was exhausted during an LP
    /// solve.
    IterationLimitReached,
}

impl SolveStatus {
    /// Snake-case name used in documents.
    pub fn as_str(self) -> &'static str {
        match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::NodeLimitReached => "node_limit_reached",
            SolveStatus::IterationLimitReached => "iteration_limit_reached",
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search counters reported with every solution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolveStats {
    /// Simplex pivots, summed over every LP solved.
    pub iterations: usize,
    /// Pivots spent in Phase I.
    pub phase_one_iterations: usize,
    /// Branch-and-cut nodes popped from the stack (0 for a pure LP).
    pub nodes_explored: usize,
    /// Deepest node depth reached.
    pub max_depth: usize,
    /// Number of times the incumbent improved.
    pub incumbent_updates: usize,
    /// Wall-clock time of the call in milliseconds.
    pub solve_time_ms: u64,
}

/// Result of a solve call.
///
/// Maps are keyed by variable or constraint name and ordered by name.
/// `variables` is populated whenever a solution was found; `duals` and
/// `reduced_costs` only for optimal pure-LP solves with duals enabled.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Solver status.
    pub status: SolveStatus,
    /// Objective value in the model's own sense, constant included.
    pub objective_value: Option<f64>,
    /// Variable assignments.
    pub variables: BTreeMap<String, f64>,
    /// Shadow price of each constraint: change of the optimal objective per
    /// unit increase of its right-hand side.
    pub duals: BTreeMap<String, f64>,
    /// Reduced cost of each variable in the model's own sense.
    pub reduced_costs: BTreeMap<String, f64>,
    /// Search counters.
    pub stats: SolveStats,
    /// Human-readable account of how the call ended.
    pub message: String,
}

impl Solution {
    /// Creates an empty solution with the given status.
    pub fn empty(status: SolveStatus) -> Self {
        Self {
            status,
            objective_value: None,
            variables: BTreeMap::new(),
            duals: BTreeMap::new(),
            reduced_costs: BTreeMap::new(),
            stats: SolveStats::default(),
            message: String::new(),
        }
    }

    pub(crate) fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Whether variable values are reported.
    pub fn is_solution_found(&self) -> bool {
        self.objective_value.is_some()
    }

    /// Whether the reported solution is proven optimal.
    pub fn is_proven_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// Value of a variable by name.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.variables.get(name).copied()
    }

    /// Dual value of a constraint by name.
    pub fn dual(&self, name: &str) -> Option<f64> {
        self.duals.get(name).copied()
    }

    /// Reduced cost of a variable by name.
    pub fn reduced_cost(&self, name: &str) -> Option<f64> {
        self.reduced_costs.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_solution() {
        let s = Solution::empty(SolveStatus::Infeasible);
        assert!(!s.is_solution_found());
        assert!(!s.is_proven_optimal());
        assert!(s.variables.is_empty());
        assert_eq!(s.stats, SolveStats::default());
    }

    #[test]
    fn test_lookup() {
        let mut s = Solution::empty(SolveStatus::Optimal);
        s.objective_value = Some(3.0);
        s.variables.insert("x".into(), 1.5);
        s.duals.insert("c1".into(), -0.5);
        assert!(s.is_solution_found());
        assert!(s.is_proven_optimal());
        assert_eq!(s.value("x"), Some(1.5));
        assert_eq!(s.value("y"), None);
        assert_eq!(s.dual("c1"), Some(-0.5));
        assert_eq!(s.reduced_cost("x"), None);
    }

    #[test]
    fn test_status_names() {
        assert_eq!(SolveStatus::NodeLimitReached.to_string(), "node_limit_reached");
        assert_eq!(SolveStatus::IterationLimitReached.as_str(), "iteration_limit_reached");
        assert_eq!(SolveStatus::Optimal.as_str(), "optimal");
    }
}
