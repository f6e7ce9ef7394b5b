//! The local search driver: proposes moves, scores deltas, accepts or
//! rejects, and tracks the best solution seen.

use crate::config::SolverConfig;
use crate::moves;
use crate::problem::Problem;
use crate::score::{Evaluator, Score};
use crate::solution::{Solution, Stop};
use crate::utils::format_duration;
use itertools::Itertools;
use log::{debug, info, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Why the search loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    TimeLimit,
    IterationLimit,
    Cancelled,
}

/// Driver lifecycle. A caller running the driver on a background thread can
/// poll this to distinguish seeding from searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Searching,
    Terminated,
}

/// Counters and outcome of one driver run.
#[derive(Debug, Clone)]
pub struct SearchStatistics {
    pub iterations: u64,
    pub accepted_moves: u64,
    pub runtime: Duration,
    pub best_score: Score,
    pub termination: TerminationReason,
}

impl SearchStatistics {
    /// Format the statistics as a string.
    pub fn format(&self) -> String {
        format!(
            "Search Statistics:
- Iterations: {}
- Accepted Moves: {}
- Runtime: {}
- Best Score: {}
- Termination: {:?}",
            self.iterations,
            self.accepted_moves,
            format_duration(self.runtime),
            self.best_score,
            self.termination
        )
    }
}

/// The metaheuristic loop.
///
/// Owns the one mutable working solution for the duration of a run; no
/// other component touches it. All randomness flows through a single
/// seeded RNG, so runs with equal inputs and seeds replay the same
/// accepted-move sequence.
pub struct LocalSearch {
    config: SolverConfig,
    evaluator: Evaluator,
    rng: ChaCha8Rng,
    cancel: Arc<AtomicBool>,
    phase: Phase,
    neighbors: Vec<Vec<usize>>,
}

impl LocalSearch {
    pub fn new(config: SolverConfig, cancel: Arc<AtomicBool>) -> Self {
        let evaluator = Evaluator::new(config.vehicle_use_penalty);
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        LocalSearch {
            config,
            evaluator,
            rng,
            cancel,
            phase: Phase::Initializing,
            neighbors: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run the search until a budget is exhausted or the caller cancels.
    ///
    /// Returns the best solution observed, not necessarily the final one.
    pub fn run(&mut self, problem: &Problem) -> (Solution, SearchStatistics) {
        let start = Instant::now();
        self.phase = Phase::Initializing;

        self.neighbors = build_neighbors(problem, self.config.granularity);

        let mut current = self.greedy_seed(problem);
        let initial = self.evaluator.full_evaluate(problem, &mut current);
        debug!("seed solution scored {}", initial);

        let mut best = current.clone();
        let mut temperature = self.config.initial_temperature;
        let mut iterations: u64 = 0;
        let mut accepted: u64 = 0;

        self.phase = Phase::Searching;
        let termination = loop {
            // The only suspension point: budgets and the cooperative cancel
            // flag are observed at the top of every iteration.
            if let Some(reason) = self.should_terminate(start, iterations) {
                break reason;
            }
            iterations += 1;

            let proposed = moves::propose(&mut self.rng, &current, &self.neighbors);
            if let Some(mv) = proposed {
                let previous = current.score;
                let inverse = mv.apply(&mut current);
                let candidate = self.evaluator.evaluate(problem, &mut current);

                if self.accept(previous, candidate, temperature) {
                    accepted += 1;
                    if candidate < best.score {
                        trace!("iteration {}: new best {}", iterations, candidate);
                        best = current.clone();
                    }
                } else {
                    inverse.apply(&mut current);
                    current.score = previous;
                }
            }

            if let Some(temp) = temperature.as_mut() {
                *temp *= self.config.cooling_rate;
            }
        };
        self.phase = Phase::Terminated;

        let statistics = SearchStatistics {
            iterations,
            accepted_moves: accepted,
            runtime: start.elapsed(),
            best_score: best.score,
            termination,
        };
        info!(
            "search terminated ({:?}) after {} iterations, best {}",
            termination, iterations, best.score
        );

        (best, statistics)
    }

    /// Build the starting solution: nearest-vehicle-first, heaviest demand
    /// placed first so the bulky points claim capacity early.
    ///
    /// When no vehicle has room left the point still goes to the one with
    /// the most remaining capacity; the seed may overflow but never leaves a
    /// point unrouted.
    fn greedy_seed(&mut self, problem: &Problem) -> Solution {
        let mut solution = Solution::new(problem);
        let mut loads = vec![0.0f64; problem.vehicle_count()];

        let mut order: Vec<usize> = (0..problem.point_count()).collect();
        order.sort_by(|&a, &b| {
            problem
                .demand_kg(b)
                .total_cmp(&problem.demand_kg(a))
                .then(a.cmp(&b))
        });

        for point in order {
            let demand = problem.demand_kg(point);

            let mut chosen: Option<usize> = None;
            let mut chosen_distance = i64::MAX;
            for vehicle in 0..problem.vehicle_count() {
                if loads[vehicle] + demand > problem.vehicles[vehicle].capacity_kg {
                    continue;
                }
                let from_tail = match solution.tail(vehicle) {
                    Some(tail) => {
                        problem.point_distance_m(solution.assignment(tail).point, point)
                    }
                    None => problem.depot_distance_m(point),
                };
                if from_tail < chosen_distance {
                    chosen = Some(vehicle);
                    chosen_distance = from_tail;
                }
            }

            let vehicle = chosen.unwrap_or_else(|| {
                let mut fallback = 0;
                let mut most_room = f64::MIN;
                for v in 0..problem.vehicle_count() {
                    let room = problem.vehicles[v].capacity_kg - loads[v];
                    if room > most_room {
                        most_room = room;
                        fallback = v;
                    }
                }
                fallback
            });

            let anchor = match solution.tail(vehicle) {
                Some(tail) => Stop::Visit(tail),
                None => Stop::Depot(vehicle),
            };
            solution.insert_after(point, anchor);
            loads[vehicle] += demand;
        }

        solution
    }

    /// Check the termination conditions. `None` means keep searching.
    fn should_terminate(&self, start: Instant, iterations: u64) -> Option<TerminationReason> {
        if self.cancel.load(Ordering::Relaxed) {
            return Some(TerminationReason::Cancelled);
        }
        if let Some(limit) = self.config.time_limit {
            if start.elapsed() >= limit {
                return Some(TerminationReason::TimeLimit);
            }
        }
        if let Some(cap) = self.config.max_iterations {
            if iterations >= cap {
                return Some(TerminationReason::IterationLimit);
            }
        }
        None
    }

    /// Acceptance policy: never refuse a candidate that is at least as good
    /// as the incumbent. With a temperature configured, a soft-only
    /// worsening is additionally accepted with probability
    /// `exp(-delta / temperature)`; a hard worsening never is.
    fn accept(&mut self, previous: Score, candidate: Score, temperature: Option<f64>) -> bool {
        if candidate <= previous {
            return true;
        }

        let Some(temp) = temperature else {
            return false;
        };
        if candidate.hard != previous.hard || temp <= f64::EPSILON {
            return false;
        }

        let delta = (candidate.soft - previous.soft) as f64;
        let probability = (-delta / temp).exp().clamp(0.0, 1.0);
        self.rng.gen_bool(probability)
    }
}

/// Per-point nearest-neighbor lists used to bias move operands, the
/// granularity trick that keeps candidate edges short.
fn build_neighbors(problem: &Problem, granularity: usize) -> Vec<Vec<usize>> {
    let n = problem.point_count();
    (0..n)
        .map(|i| {
            (0..n)
                .filter(|&j| j != i)
                .sorted_by_key(|&j| problem.point_distance_m(i, j))
                .take(granularity)
                .collect()
        })
        .collect()
}
