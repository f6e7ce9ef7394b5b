//! Configuration parameters for the local search solver.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Solver settings, passed explicitly into every solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Seed for the single RNG driving every stochastic choice. Equal seeds
    /// and equal inputs reproduce the exact accepted-move sequence.
    pub seed: u64,
    /// Wall-clock budget for the search loop.
    pub time_limit: Option<Duration>,
    /// Iteration cap for the search loop.
    pub max_iterations: Option<u64>,
    /// Neighbor-list size used to bias relocate and swap operands.
    pub granularity: usize,
    /// Soft penalty per vehicle that makes at least one visit.
    pub vehicle_use_penalty: i64,
    /// Enables simulated-annealing acceptance of soft-worsening moves when
    /// set. `None` keeps the greedy accept-if-not-worse baseline.
    pub initial_temperature: Option<f64>,
    /// Per-iteration geometric temperature decay.
    pub cooling_rate: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            seed: 0,
            time_limit: None,
            max_iterations: Some(100_000),
            granularity: 20,
            vehicle_use_penalty: 100,
            initial_temperature: None,
            cooling_rate: 0.9995,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        SolverConfig::default()
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the wall-clock budget.
    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = Some(duration);
        self
    }

    /// Set the iteration cap.
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Set the neighbor-list size.
    pub fn with_granularity(mut self, granularity: usize) -> Self {
        self.granularity = granularity;
        self
    }

    /// Set the soft penalty charged per used vehicle.
    pub fn with_vehicle_use_penalty(mut self, penalty: i64) -> Self {
        self.vehicle_use_penalty = penalty;
        self
    }

    /// Enable simulated-annealing acceptance with the given start
    /// temperature, in soft-score units.
    pub fn with_initial_temperature(mut self, temperature: f64) -> Self {
        self.initial_temperature = Some(temperature);
        self
    }

    /// Set the per-iteration temperature decay factor.
    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }
}
