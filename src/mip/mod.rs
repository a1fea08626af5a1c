//! Mixed-integer programming by branch-and-cut.
//!
//! Extends the simplex engine to integrality-flagged variables. Each node
//! of the search tree is the model under tightened bounds; its LP
//! relaxation either proves the node empty, is dominated by the incumbent,
//! is already integral, or splits on its most fractional integer variable.
//! The only cuts are bound tightenings derived from constraint activities.
//!
//! The search is depth-first over an explicit stack and stops early on the
//! node budget, the wall-clock limit or cancellation, returning the best
//! incumbent with status `NodeLimitReached`.
//!
//! # References
//!
//! - Land & Doig (1960), "An Automatic Method of Solving Discrete
//!   Programming Problems"
//! - Savelsbergh (1994), "Preprocessing and Probing Techniques for Mixed
//!   Integer Programming Problems"

mod propagate;
mod runner;
mod types;

pub use propagate::{BoundPropagator, Propagation, PropagationStats};
pub use runner::BranchAndCut;
pub use types::{BranchDirection, BranchNode, NodeOutcome};
