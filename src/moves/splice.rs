//! Chain-splice neighborhood: move a contiguous sub-chain across vehicles.

use super::Move;
use crate::solution::{Solution, Stop};
use rand::Rng;

const SAMPLE_ATTEMPTS: usize = 8;
const MAX_SEGMENT: usize = 4;

/// Propose detaching a sub-chain of at least two visits and re-chaining it
/// onto a different vehicle. Single-visit transfers belong to relocate.
pub(crate) fn propose<R: Rng>(rng: &mut R, solution: &Solution) -> Option<Move> {
    if solution.vehicle_count() < 2 {
        return None;
    }

    for _ in 0..SAMPLE_ATTEMPTS {
        let src = rng.gen_range(0..solution.vehicle_count());
        let chain = solution.chain(src);
        if chain.len() < 2 {
            continue;
        }

        let start = rng.gen_range(0..chain.len() - 1);
        let max_len = MAX_SEGMENT.min(chain.len() - start);
        let len = rng.gen_range(2..=max_len);

        let mut dst = rng.gen_range(0..solution.vehicle_count() - 1);
        if dst >= src {
            dst += 1;
        }

        let dst_chain = solution.chain(dst);
        let pos = rng.gen_range(0..=dst_chain.len());
        let to = if pos == 0 {
            Stop::Depot(dst)
        } else {
            Stop::Visit(dst_chain[pos - 1])
        };

        return Some(Move::Splice {
            seg_head: chain[start],
            len,
            to,
        });
    }
    None
}
