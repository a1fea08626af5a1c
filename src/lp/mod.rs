//! Linear programming: standard form and two-phase primal simplex.
//!
//! A [`Model`](crate::model::Model) is first rewritten into equality form
//! over non-negative columns by [`StandardForm`], then solved on a dense
//! [`Tableau`] by [`SimplexRunner`]. Phase I minimizes the sum of
//! artificial columns to find a feasible basis; Phase II optimizes the
//! true objective from there.
//!
//! Pricing is Dantzig's most-negative reduced cost. After a run of
//! non-improving pivots the runner falls back to Bland's rule, which
//! cannot cycle, and returns to Dantzig once the objective moves again.
//!
//! # References
//!
//! - Dantzig (1963), "Linear Programming and Extensions"
//! - Bland (1977), "New finite pivoting rules for the simplex method"
//! - Beale (1955), "Cycling in the dual simplex algorithm"

mod runner;
mod standard;
mod tableau;

pub use runner::{LpStatus, SimplexResult, SimplexRunner};
pub use standard::{ColumnKind, RowOrigin, StandardForm, VarTransform};
pub use tableau::Tableau;
