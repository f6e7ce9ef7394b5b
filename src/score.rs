//! Two-tier score and the constraint evaluator.

use crate::problem::Problem;
use crate::solution::{Solution, Stop};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A lexicographic hard/soft score. Lower is better on both axes, and any
/// hard difference dominates every soft difference.
///
/// The derived `Ord` compares `hard` first, then `soft`, which is exactly
/// the required ordering.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Score {
    pub hard: i64,
    pub soft: i64,
}

impl Score {
    pub fn new(hard: i64, soft: i64) -> Self {
        Score { hard, soft }
    }

    /// A solution is feasible when no hard constraint is violated.
    pub fn is_feasible(&self) -> bool {
        self.hard == 0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}hard/{}soft", self.hard, self.soft)
    }
}

/// Scores a solution against the constraint set.
///
/// Hard: vehicle capacity overflow (kg, rounded up) plus one unit per
/// unrouted point. Soft: total chained route distance in meters plus a flat
/// penalty per vehicle that makes at least one visit, which steers the
/// search toward fewer vehicles.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    pub vehicle_use_penalty: i64,
}

impl Evaluator {
    pub fn new(vehicle_use_penalty: i64) -> Self {
        Evaluator {
            vehicle_use_penalty,
        }
    }

    /// Score the solution, recomputing only vehicles marked dirty.
    ///
    /// A move touches at most two vehicles, so after the initial full pass
    /// each call walks only the chains that actually changed. The result is
    /// also stored on the solution.
    pub fn evaluate(&self, problem: &Problem, solution: &mut Solution) -> Score {
        for vehicle in 0..solution.vehicle_count() {
            solution.recompute_vehicle(problem, vehicle);
        }

        let mut hard = solution.unassigned_count() as i64;
        let mut soft = 0;

        for vehicle in 0..solution.vehicle_count() {
            let overflow = solution.load_kg(vehicle) - problem.vehicles[vehicle].capacity_kg;
            if overflow > 0.0 {
                // Ceil so that hard == 0 really means no overflow.
                hard += overflow.ceil() as i64;
            }

            soft += solution.distance_m(vehicle);
            if solution.head(vehicle).is_some() {
                soft += self.vehicle_use_penalty;
            }
        }

        let score = Score::new(hard, soft);
        solution.score = score;
        score
    }

    /// Score from scratch, ignoring every cache. Ground truth for tests and
    /// the one-time initial evaluation.
    pub fn full_evaluate(&self, problem: &Problem, solution: &mut Solution) -> Score {
        solution.mark_all_dirty();
        self.evaluate(problem, solution)
    }

    /// Soft-distance delta of inserting `point` directly after `anchor`,
    /// without touching the solution. O(1): only the broken and created
    /// edges are looked at.
    pub fn insertion_delta_m(
        &self,
        problem: &Problem,
        solution: &Solution,
        point: usize,
        anchor: Stop,
    ) -> i64 {
        let (anchor_point, old_succ) = match anchor {
            Stop::Depot(v) => (None, solution.head(v)),
            Stop::Visit(a) => (Some(solution.assignment(a).point), solution.next_of(a)),
        };

        let edge_in = match anchor_point {
            None => problem.depot_distance_m(point),
            Some(p) => problem.point_distance_m(p, point),
        };

        match old_succ {
            None => edge_in,
            Some(succ) => {
                let succ_point = solution.assignment(succ).point;
                let edge_out = problem.point_distance_m(point, succ_point);
                let broken = match anchor_point {
                    None => problem.depot_distance_m(succ_point),
                    Some(p) => problem.point_distance_m(p, succ_point),
                };
                edge_in + edge_out - broken
            }
        }
    }

    /// Soft-distance delta of unrouting an assignment. O(1), counterpart of
    /// [`Evaluator::insertion_delta_m`].
    pub fn removal_delta_m(&self, problem: &Problem, solution: &Solution, idx: usize) -> i64 {
        let assignment = solution.assignment(idx);
        let point = assignment.point;
        let prev = assignment
            .previous
            .expect("removal delta of an unrouted assignment");

        let prev_point = match prev {
            Stop::Depot(_) => None,
            Stop::Visit(a) => Some(solution.assignment(a).point),
        };

        let edge_in = match prev_point {
            None => problem.depot_distance_m(point),
            Some(p) => problem.point_distance_m(p, point),
        };

        match solution.next_of(idx) {
            None => -edge_in,
            Some(succ) => {
                let succ_point = solution.assignment(succ).point;
                let edge_out = problem.point_distance_m(point, succ_point);
                let bridged = match prev_point {
                    None => problem.depot_distance_m(succ_point),
                    Some(p) => problem.point_distance_m(p, succ_point),
                };
                bridged - edge_in - edge_out
            }
        }
    }
}
