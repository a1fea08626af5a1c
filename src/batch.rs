//! Solving many independent models in one call.

use crate::error::SolveResult;
use crate::model::Model;
use crate::options::SolveOptions;
use crate::solution::Solution;
use crate::solver::Engine;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Solves every model with the same options.
///
/// Results are returned in input order. With the `parallel` feature the
/// models are distributed over the rayon thread pool; each solve is still
/// single-threaded and owns its own tableau.
pub fn solve_batch(models: &[Model], options: &SolveOptions) -> Vec<SolveResult<Solution>> {
    let engine = Engine::new();

    #[cfg(feature = "parallel")]
    {
        models.par_iter().map(|m| engine.solve(m, options)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        models.iter().map(|m| engine.solve(m, options)).collect()
    }
}
