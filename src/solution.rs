//! Chained-route solution representation.
//!
//! Routes are linked structures rather than ordered lists: every routed
//! assignment records the stop it follows, so inserts and removals relink a
//! handful of indices instead of shifting positions. All links are arena
//! indices, never references, which keeps chain walks cycle-safe and makes
//! a move's undo a matter of restoring a few indices.

use crate::problem::Problem;
use crate::score::Score;
use serde::Serialize;
use std::fmt;

/// A stop in a vehicle's chain: the depot anchor of a vehicle, or a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stop {
    /// The implicit depot start of the given vehicle's route.
    Depot(usize),
    /// The visit made for the given assignment.
    Visit(usize),
}

/// One routing decision per collection point.
///
/// `vehicle == None` means the point is unrouted, which the evaluator counts
/// as a hard violation. `previous` is `None` exactly when the assignment is
/// unrouted.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub point: usize,
    pub vehicle: Option<usize>,
    pub previous: Option<Stop>,
}

/// A mutable candidate solution: the assignment arena plus derived chain
/// structure and per-vehicle caches.
///
/// The successor links, chain heads/tails and the load/distance caches are
/// redundant with the `previous` links and are kept in sync by the mutation
/// primitives. Caches go stale through the per-vehicle dirty flag and are
/// refreshed by [`Solution::recompute_vehicle`].
#[derive(Clone)]
pub struct Solution {
    assignments: Vec<Assignment>,
    next: Vec<Option<usize>>,
    heads: Vec<Option<usize>>,
    tails: Vec<Option<usize>>,
    loads_kg: Vec<f64>,
    distances_m: Vec<i64>,
    dirty: Vec<bool>,
    unassigned: usize,
    pub score: Score,
}

impl Solution {
    /// Create the all-unrouted starting solution for a problem.
    pub fn new(problem: &Problem) -> Self {
        let n = problem.point_count();
        let v = problem.vehicle_count();

        Solution {
            assignments: (0..n)
                .map(|point| Assignment {
                    point,
                    vehicle: None,
                    previous: None,
                })
                .collect(),
            next: vec![None; n],
            heads: vec![None; v],
            tails: vec![None; v],
            loads_kg: vec![0.0; v],
            distances_m: vec![0; v],
            dirty: vec![true; v],
            unassigned: n,
            score: Score::default(),
        }
    }

    pub fn assignment(&self, idx: usize) -> &Assignment {
        &self.assignments[idx]
    }

    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    pub fn vehicle_count(&self) -> usize {
        self.heads.len()
    }

    pub fn unassigned_count(&self) -> usize {
        self.unassigned
    }

    /// First visit of a vehicle's chain, if any.
    pub fn head(&self, vehicle: usize) -> Option<usize> {
        self.heads[vehicle]
    }

    /// Last visit of a vehicle's chain, if any.
    pub fn tail(&self, vehicle: usize) -> Option<usize> {
        self.tails[vehicle]
    }

    /// Successor visit of an assignment within its chain.
    pub fn next_of(&self, idx: usize) -> Option<usize> {
        self.next[idx]
    }

    /// The vehicle owning a stop.
    pub fn stop_vehicle(&self, stop: Stop) -> Option<usize> {
        match stop {
            Stop::Depot(v) => Some(v),
            Stop::Visit(a) => self.assignments[a].vehicle,
        }
    }

    pub fn is_dirty(&self, vehicle: usize) -> bool {
        self.dirty[vehicle]
    }

    pub fn mark_dirty(&mut self, vehicle: usize) {
        self.dirty[vehicle] = true;
    }

    pub fn mark_all_dirty(&mut self) {
        self.dirty.iter_mut().for_each(|d| *d = true);
    }

    /// Cached total demand chained onto a vehicle. Stale while dirty.
    pub fn load_kg(&self, vehicle: usize) -> f64 {
        self.loads_kg[vehicle]
    }

    /// Cached route distance of a vehicle in meters. Stale while dirty.
    pub fn distance_m(&self, vehicle: usize) -> i64 {
        self.distances_m[vehicle]
    }

    /// Insert an unrouted assignment directly after `anchor`.
    ///
    /// Panics if the assignment is already routed or the anchor stop is not
    /// itself on a route; both indicate a broken move generator.
    pub fn insert_after(&mut self, idx: usize, anchor: Stop) {
        assert!(
            self.assignments[idx].vehicle.is_none(),
            "insert_after on a routed assignment"
        );
        let vehicle = self
            .stop_vehicle(anchor)
            .expect("insertion anchor is unrouted");

        let old_succ = match anchor {
            Stop::Depot(v) => self.heads[v],
            Stop::Visit(a) => self.next[a],
        };

        self.assignments[idx].vehicle = Some(vehicle);
        self.assignments[idx].previous = Some(anchor);
        self.next[idx] = old_succ;

        match anchor {
            Stop::Depot(v) => self.heads[v] = Some(idx),
            Stop::Visit(a) => self.next[a] = Some(idx),
        }
        match old_succ {
            Some(succ) => self.assignments[succ].previous = Some(Stop::Visit(idx)),
            None => self.tails[vehicle] = Some(idx),
        }

        self.unassigned -= 1;
        self.dirty[vehicle] = true;
    }

    /// Unroute an assignment, relinking its predecessor to its successor.
    ///
    /// Returns the stop it was chained after, so callers can undo.
    pub fn remove(&mut self, idx: usize) -> Stop {
        let vehicle = self.assignments[idx]
            .vehicle
            .expect("remove on an unrouted assignment");
        let prev = self.assignments[idx]
            .previous
            .expect("routed assignment without a previous stop");
        let succ = self.next[idx];

        match prev {
            Stop::Depot(v) => self.heads[v] = succ,
            Stop::Visit(a) => self.next[a] = succ,
        }
        match succ {
            Some(s) => self.assignments[s].previous = Some(prev),
            None => self.tails[vehicle] = prev_visit(prev),
        }

        self.assignments[idx].vehicle = None;
        self.assignments[idx].previous = None;
        self.next[idx] = None;

        self.unassigned += 1;
        self.dirty[vehicle] = true;
        prev
    }

    /// The assignments chained to a vehicle, in visit order.
    pub fn chain(&self, vehicle: usize) -> Vec<usize> {
        let mut order = Vec::new();
        let mut cursor = self.heads[vehicle];
        while let Some(idx) = cursor {
            order.push(idx);
            cursor = self.next[idx];
        }
        order
    }

    pub fn chain_len(&self, vehicle: usize) -> usize {
        let mut len = 0;
        let mut cursor = self.heads[vehicle];
        while let Some(idx) = cursor {
            len += 1;
            cursor = self.next[idx];
        }
        len
    }

    /// Relink a vehicle's chain to the given visit order.
    ///
    /// Every assignment in `order` must already belong to this vehicle; the
    /// slice must be a permutation of the current chain. Used by moves that
    /// rewrite whole segments (2-opt, splice) instead of single links.
    pub fn relink_chain(&mut self, vehicle: usize, order: &[usize]) {
        debug_assert!(order
            .iter()
            .all(|&a| self.assignments[a].vehicle == Some(vehicle)));

        let mut prev = Stop::Depot(vehicle);
        self.heads[vehicle] = order.first().copied();
        for &idx in order {
            self.assignments[idx].previous = Some(prev);
            match prev {
                Stop::Depot(_) => {}
                Stop::Visit(p) => self.next[p] = Some(idx),
            }
            prev = Stop::Visit(idx);
        }
        match prev {
            Stop::Depot(_) => self.tails[vehicle] = None,
            Stop::Visit(last) => {
                self.next[last] = None;
                self.tails[vehicle] = Some(last);
            }
        }
        self.dirty[vehicle] = true;
    }

    /// Walk `previous` links from an assignment back to its vehicle.
    ///
    /// Returns the vehicle index, or `None` if the walk does not terminate
    /// at a depot stop within `assignment_count` steps. A `None` on a routed
    /// assignment means the chain structure is corrupt.
    pub fn walk_to_vehicle(&self, idx: usize) -> Option<usize> {
        let mut cursor = self.assignments[idx].previous?;
        for _ in 0..self.assignments.len() {
            match cursor {
                Stop::Depot(v) => return Some(v),
                Stop::Visit(a) => cursor = self.assignments[a].previous?,
            }
        }
        None
    }

    /// Refresh the load and distance caches of one vehicle from its chain.
    pub fn recompute_vehicle(&mut self, problem: &Problem, vehicle: usize) {
        if !self.dirty[vehicle] {
            return;
        }

        let mut load = 0.0;
        let mut distance = 0;
        let mut prev: Option<usize> = None;

        let mut cursor = self.heads[vehicle];
        while let Some(idx) = cursor {
            let point = self.assignments[idx].point;
            load += problem.demand_kg(point);
            distance += match prev {
                None => problem.depot_distance_m(point),
                Some(prev_point) => problem.point_distance_m(prev_point, point),
            };
            prev = Some(point);
            cursor = self.next[idx];
        }

        self.loads_kg[vehicle] = load;
        self.distances_m[vehicle] = distance;
        self.dirty[vehicle] = false;
    }

    /// Extract the caller-facing snapshot of this solution.
    pub fn to_snapshot(&self, problem: &Problem) -> SolutionSnapshot {
        let routes = (0..self.vehicle_count())
            .map(|v| VehicleRoute {
                vehicle_id: problem.vehicles[v].id,
                stops: self
                    .chain(v)
                    .into_iter()
                    .map(|a| problem.points[self.assignments[a].point].id)
                    .collect(),
            })
            .collect();

        let unassigned = self
            .assignments
            .iter()
            .filter(|a| a.vehicle.is_none())
            .map(|a| problem.points[a.point].id)
            .collect();

        SolutionSnapshot {
            routes,
            unassigned,
            score: self.score,
        }
    }
}

fn prev_visit(stop: Stop) -> Option<usize> {
    match stop {
        Stop::Depot(_) => None,
        Stop::Visit(a) => Some(a),
    }
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solution:")?;
        writeln!(f, "  Score: {}", self.score)?;
        writeln!(f, "  Unassigned: {}", self.unassigned)?;

        for v in 0..self.vehicle_count() {
            let points: Vec<usize> = self
                .chain(v)
                .into_iter()
                .map(|a| self.assignments[a].point)
                .collect();
            writeln!(
                f,
                "  Vehicle {}: {:?} (load: {:.2} kg, distance: {} m)",
                v, points, self.loads_kg[v], self.distances_m[v]
            )?;
        }

        Ok(())
    }
}

/// Ordered visit sequence of one vehicle, in external ids.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleRoute {
    pub vehicle_id: u64,
    pub stops: Vec<u64>,
}

/// The solution shape handed back to callers: per-vehicle visit sequences,
/// the points left unrouted, and the two-part score.
#[derive(Debug, Clone, Serialize)]
pub struct SolutionSnapshot {
    pub routes: Vec<VehicleRoute>,
    pub unassigned: Vec<u64>,
    pub score: Score,
}
