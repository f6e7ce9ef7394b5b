//! Relocate neighborhood: re-chain a single assignment elsewhere.

use super::Move;
use crate::solution::{Solution, Stop};
use rand::Rng;

/// Propose relocating one assignment after a nearby visit or a depot start.
///
/// Unrouted assignments are sampled like any other, which is what routes
/// them in the first place. Anchors are biased toward the point's
/// precomputed nearest neighbors; the depot fallback keeps empty vehicles
/// reachable.
pub(crate) fn propose<R: Rng>(
    rng: &mut R,
    solution: &Solution,
    neighbors: &[Vec<usize>],
) -> Option<Move> {
    let assignment = rng.gen_range(0..solution.assignment_count());

    let candidates = &neighbors[assignment];
    let anchor = if !candidates.is_empty() && rng.gen_bool(0.8) {
        let pick = candidates[rng.gen_range(0..candidates.len())];
        if solution.assignment(pick).vehicle.is_some() {
            Stop::Visit(pick)
        } else {
            Stop::Depot(rng.gen_range(0..solution.vehicle_count()))
        }
    } else {
        Stop::Depot(rng.gen_range(0..solution.vehicle_count()))
    };

    // Reinserting behind the current predecessor would be a no-op.
    if solution.assignment(assignment).previous == Some(anchor) {
        return None;
    }

    Some(Move::Relocate { assignment, to: anchor })
}
