//! Linear and mixed-integer linear programming engine.
//!
//! Solves small to medium models exactly in pure Rust:
//!
//! - **Model**: named variables with bounds and integrality, linear
//!   constraints and a linear objective, validated before solving.
//! - **LP**: standard-form conversion, dense tableau and a two-phase
//!   primal simplex with Dantzig pricing and Bland's-rule anti-cycling.
//!   Optimal solutions carry row duals and reduced costs.
//! - **MILP**: depth-first branch-and-bound with activity-based bound
//!   propagation at every node.
//! - **Engine**: the [`Solver`] trait, deadline and cancellation handling,
//!   and an optional delegation to an external solver (feature `microlp`).
//! - **Documents**: JSON model/solution documents (feature `serde`).
//!
//! Infeasible, unbounded and limit-reached outcomes are reported through
//! [`SolveStatus`]; only malformed input and numerical breakdowns are
//! errors.
//!
//! # Example
//!
//! ```
//! use u_linprog::{solve, Comparator, LinearExpr, Model, Sense, SolveOptions, SolveStatus, Variable};
//!
//! // max 3x + 5y  s.t.  x <= 4, 2y <= 12, 3x + 2y <= 18
//! let mut model = Model::new("wyndor", Sense::Maximize);
//! let x = model.add_variable(Variable::new("x")).unwrap();
//! let y = model.add_variable(Variable::new("y")).unwrap();
//! model.set_objective(LinearExpr::new().term(x, 3.0).term(y, 5.0)).unwrap();
//! model.add_constraint("plant1", LinearExpr::new().term(x, 1.0), Comparator::Le, 4.0).unwrap();
//! model.add_constraint("plant2", LinearExpr::new().term(y, 2.0), Comparator::Le, 12.0).unwrap();
//! model
//!     .add_constraint("plant3", LinearExpr::new().term(x, 3.0).term(y, 2.0), Comparator::Le, 18.0)
//!     .unwrap();
//!
//! let solution = solve(&model, &SolveOptions::default()).unwrap();
//! assert_eq!(solution.status, SolveStatus::Optimal);
//! assert!((solution.objective_value.unwrap() - 36.0).abs() < 1e-9);
//! assert!((solution.dual("plant2").unwrap() - 1.5).abs() < 1e-9);
//! ```

pub mod batch;
pub mod deadline;
#[cfg(feature = "serde")]
pub mod document;
pub mod error;
pub mod external;
pub mod generate;
pub mod lp;
pub mod mip;
pub mod model;
pub mod numeric;
pub mod options;
pub mod solution;
pub mod solver;

pub use batch::solve_batch;
pub use error::{SolveError, SolveResult, ValidationError};
pub use model::{Bounds, Comparator, Constraint, ConstraintId, LinearExpr, Model, Objective, Sense, VarId, Variable};
pub use options::{PivotRule, SolveOptions};
pub use solution::{Solution, SolveStats, SolveStatus};
pub use solver::{solve, solve_with_cancel, BranchAndCutSolver, Engine, Solver};
