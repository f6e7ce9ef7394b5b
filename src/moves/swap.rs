//! Swap neighborhood: exchange the chain slots of two assignments.

use super::Move;
use crate::solution::Solution;
use rand::Rng;

const SAMPLE_ATTEMPTS: usize = 8;

/// Propose swapping a routed assignment with a routed near-neighbor.
pub(crate) fn propose<R: Rng>(
    rng: &mut R,
    solution: &Solution,
    neighbors: &[Vec<usize>],
) -> Option<Move> {
    let a = sample_routed(rng, solution)?;

    // Prefer a partner among the point's nearest neighbors; distant swaps
    // almost never pay off.
    let candidates = &neighbors[a];
    for _ in 0..SAMPLE_ATTEMPTS {
        if candidates.is_empty() {
            break;
        }
        let b = candidates[rng.gen_range(0..candidates.len())];
        if b != a && solution.assignment(b).vehicle.is_some() {
            return Some(Move::Swap { a, b });
        }
    }

    let b = sample_routed(rng, solution)?;
    if b == a {
        return None;
    }
    Some(Move::Swap { a, b })
}

fn sample_routed<R: Rng>(rng: &mut R, solution: &Solution) -> Option<usize> {
    for _ in 0..SAMPLE_ATTEMPTS {
        let idx = rng.gen_range(0..solution.assignment_count());
        if solution.assignment(idx).vehicle.is_some() {
            return Some(idx);
        }
    }
    None
}
