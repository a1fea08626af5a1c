//! External solver adapters.
//!
//! Each adapter implements [`Solver`](crate::solver::Solver) and is reached
//! through [`Engine`](crate::solver::Engine) when
//! [`SolveOptions::use_external`](crate::options::SolveOptions::use_external)
//! is set. Callers may also inject their own implementation with
//! [`Engine::with_external`](crate::solver::Engine::with_external).

#[cfg(feature = "microlp")]
mod microlp;

#[cfg(feature = "microlp")]
pub use self::microlp::MicrolpSolver;
