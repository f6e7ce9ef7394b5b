//! # leafroute
//!
//! A local search solver for capacitated collection routing: a fleet of
//! capacity-bounded vehicles must visit every collection point exactly once,
//! and the solver sequences the visits to minimize travel distance and the
//! number of vehicles used.
//!
//! Routes are predecessor chains over an index arena rather than ordered
//! lists, scored with a lexicographic hard/soft objective (capacity and
//! coverage violations dominate distance), and improved by sampled relocate,
//! swap, 2-opt and chain-splice moves under a wall-clock or iteration
//! budget. The solver consumes a fully materialized [`Problem`] snapshot
//! and hands back the best [`Solution`] found together with its score;
//! storage and transport of either is the caller's concern.

pub mod config;
pub mod geo;
pub mod moves;
pub mod problem;
pub mod score;
pub mod search;
pub mod solution;
pub mod utils;

pub use crate::config::SolverConfig;
pub use crate::problem::{CollectionPoint, Depot, Problem, ProblemError, Vehicle};
pub use crate::score::Score;
pub use crate::solution::{Solution, SolutionSnapshot, Stop};

use crate::score::Evaluator;
use crate::search::{LocalSearch, SearchStatistics};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by [`Solver::solve`].
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("invalid problem: {0}")]
    InvalidProblem(#[from] ProblemError),
}

/// The outcome of a solve: the best solution found, its score, and the
/// search counters. The solution may be infeasible (non-zero hard score);
/// callers inspect [`Score::is_feasible`] rather than relying on an error.
#[derive(Debug)]
pub struct Solved {
    pub solution: Solution,
    pub score: Score,
    pub statistics: SearchStatistics,
}

/// The solver facade: wires the problem model, evaluator, move catalog and
/// search driver together behind a single `solve` call.
pub struct Solver {
    config: SolverConfig,
    cancel: Arc<AtomicBool>,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Solver {
            config,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The cooperative cancellation handle. Setting it to `true` stops the
    /// search within one iteration; the best solution found so far is still
    /// returned. The flag is sticky: clear it before reusing the solver.
    pub fn cancellation_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Solve the problem within the configured budget.
    ///
    /// Re-entrant: every run owns its own working state, and equal inputs
    /// with equal seeds replay the identical accepted-move sequence.
    pub fn solve(&self, problem: &Problem) -> Result<Solved, SolverError> {
        // Problem construction already validates, but the fields are public;
        // a degenerate instance must fail fast rather than search.
        if problem.vehicles.is_empty() {
            return Err(ProblemError::EmptyFleet.into());
        }
        if problem.points.is_empty() {
            return Err(ProblemError::NoCollectionPoints.into());
        }

        let mut driver = LocalSearch::new(self.config.clone(), Arc::clone(&self.cancel));
        let (mut best, statistics) = driver.run(problem);

        // Settle every cache so the returned snapshot is self-consistent.
        let evaluator = Evaluator::new(self.config.vehicle_use_penalty);
        let score = evaluator.full_evaluate(problem, &mut best);

        Ok(Solved {
            solution: best,
            score,
            statistics,
        })
    }
}
