//! 2-opt neighborhood: reverse a contiguous sub-segment of one chain.

use super::Move;
use crate::solution::Solution;
use rand::Rng;

const SAMPLE_ATTEMPTS: usize = 8;

/// Propose reversing a random segment of a random vehicle's chain.
pub(crate) fn propose<R: Rng>(rng: &mut R, solution: &Solution) -> Option<Move> {
    for _ in 0..SAMPLE_ATTEMPTS {
        let vehicle = rng.gen_range(0..solution.vehicle_count());
        let len = solution.chain_len(vehicle);
        if len < 2 {
            continue;
        }

        let start = rng.gen_range(0..len - 1);
        let end = rng.gen_range(start + 1..len);
        return Some(Move::TwoOpt {
            vehicle,
            start,
            end,
        });
    }
    None
}
