//! Elementary mutations of a chained-route solution.
//!
//! Each neighborhood module proposes operands for one move family; applying
//! a move returns its exact inverse, so rejection is a second `apply`. Every
//! stochastic choice goes through the caller's seeded RNG.

pub mod relocate;
pub mod splice;
pub mod swap;
pub mod two_opt;

use crate::solution::{Solution, Stop};
use rand::Rng;

/// An atomic route-structure mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Take one assignment (routed or not) and chain it after `to`.
    Relocate { assignment: usize, to: Stop },
    /// Unroute one assignment. Never proposed; exists as the inverse of
    /// relocating a previously unrouted assignment.
    Unroute { assignment: usize },
    /// Exchange the chain slots of two routed assignments.
    Swap { a: usize, b: usize },
    /// Reverse the chain positions `start..=end` of one vehicle.
    TwoOpt {
        vehicle: usize,
        start: usize,
        end: usize,
    },
    /// Detach the sub-chain of `len` visits starting at `seg_head` and
    /// re-chain it after `to`.
    Splice {
        seg_head: usize,
        len: usize,
        to: Stop,
    },
}

impl Move {
    /// Mutate the solution and return the move that undoes this one.
    pub fn apply(self, solution: &mut Solution) -> Move {
        match self {
            Move::Relocate { assignment, to } => {
                let inverse = match solution.assignment(assignment).previous {
                    Some(prev) => Move::Relocate {
                        assignment,
                        to: prev,
                    },
                    None => Move::Unroute { assignment },
                };
                if solution.assignment(assignment).vehicle.is_some() {
                    solution.remove(assignment);
                }
                solution.insert_after(assignment, to);
                inverse
            }
            Move::Unroute { assignment } => {
                let prev = solution.remove(assignment);
                Move::Relocate {
                    assignment,
                    to: prev,
                }
            }
            Move::Swap { a, b } => {
                apply_swap(solution, a, b);
                self
            }
            Move::TwoOpt {
                vehicle,
                start,
                end,
            } => {
                let mut chain = solution.chain(vehicle);
                chain[start..=end].reverse();
                solution.relink_chain(vehicle, &chain);
                self
            }
            Move::Splice { seg_head, len, to } => {
                let origin = solution
                    .assignment(seg_head)
                    .previous
                    .expect("splice of an unrouted segment");

                let mut segment = Vec::with_capacity(len);
                let mut cursor = Some(seg_head);
                for _ in 0..len {
                    let idx = cursor.expect("splice segment shorter than its length");
                    segment.push(idx);
                    cursor = solution.next_of(idx);
                }

                for &idx in &segment {
                    solution.remove(idx);
                }
                let mut anchor = to;
                for &idx in &segment {
                    solution.insert_after(idx, anchor);
                    anchor = Stop::Visit(idx);
                }

                Move::Splice {
                    seg_head,
                    len,
                    to: origin,
                }
            }
        }
    }
}

fn apply_swap(solution: &mut Solution, a: usize, b: usize) {
    // Adjacent pairs collapse to a single relocate across the shared edge.
    if solution.next_of(a) == Some(b) {
        solution.remove(a);
        solution.insert_after(a, Stop::Visit(b));
        return;
    }
    if solution.next_of(b) == Some(a) {
        solution.remove(b);
        solution.insert_after(b, Stop::Visit(a));
        return;
    }

    let prev_a = solution
        .assignment(a)
        .previous
        .expect("swap of an unrouted assignment");
    let prev_b = solution
        .assignment(b)
        .previous
        .expect("swap of an unrouted assignment");

    solution.remove(a);
    solution.remove(b);
    solution.insert_after(a, prev_b);
    solution.insert_after(b, prev_a);
}

/// Sample one candidate move, or `None` when the sampled neighborhood has no
/// valid operands this iteration.
///
/// Relocate carries half the probability mass: it is the only move that
/// routes unrouted points, and on its own it connects any two
/// configurations by a finite move sequence.
pub fn propose<R: Rng>(
    rng: &mut R,
    solution: &Solution,
    neighbors: &[Vec<usize>],
) -> Option<Move> {
    match rng.gen_range(0u32..100) {
        0..=49 => relocate::propose(rng, solution, neighbors),
        50..=69 => swap::propose(rng, solution, neighbors),
        70..=84 => two_opt::propose(rng, solution),
        _ => splice::propose(rng, solution),
    }
}
