//! Rule where the focal site switches to its best reply against the
//! current neighbourhood.

use super::Mutation;
use crate::lattice::Lattice;
use evolattice_data::Strategy;
use rand::seq::SliceRandom;
use rand::Rng;

/// Rule 7. The focal site switches to whichever strategy would earn most
/// against its current neighbours, choosing uniformly among ties.
pub(super) fn best_response<R: Rng + ?Sized>(
    lattice: &Lattice,
    focal: usize,
    rng: &mut R,
) -> Option<Mutation> {
    let candidates: Vec<(Strategy, f64)> = (0..lattice.strategy_count())
        .map(|s| {
            let s = s as Strategy;
            (s, lattice.payoff_if(focal, s))
        })
        .collect();
    let best = candidates
        .iter()
        .map(|&(_, p)| p)
        .fold(f64::NEG_INFINITY, f64::max);
    let tied: Vec<Strategy> = candidates
        .iter()
        .filter(|&&(_, p)| p == best)
        .map(|&(s, _)| s)
        .collect();
    tied.choose(rng).map(|&s| Mutation::new(focal, s))
}
