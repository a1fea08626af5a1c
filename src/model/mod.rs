//! Validated LP/MILP models.
//!
//! A [`Model`] holds named variables with bounds and integrality flags,
//! a linear objective with a direction, and named linear constraints.
//! Every insertion is checked, so the solvers can treat a model as
//! well-formed and read-only.

mod expression;
#[allow(clippy::module_inception)]
mod model;
mod variables;

pub use expression::LinearExpr;
pub use model::{Comparator, Constraint, ConstraintId, Model, Objective, Sense};
pub use variables::{Bounds, VarId, Variable};
