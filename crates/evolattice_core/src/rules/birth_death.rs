//! Rules where the focal site acts on one of its neighbours, or dies into one.

use super::{draw_until, fires, neighbor_payoffs, Mutation};
use crate::lattice::Lattice;
use rand::Rng;

/// Rule 0. A negative payoff is a death rate, a positive one a birth rate.
///
/// Exactly zero leaves the lattice untouched.
pub(super) fn payoff_birth_death<R: Rng + ?Sized>(
    lattice: &Lattice,
    focal: usize,
    rng: &mut R,
) -> Option<Mutation> {
    let payoff = lattice.payoff_at(focal);
    let max_rate = lattice.max_rate();
    if payoff < 0.0 {
        if fires(rng, -payoff / max_rate) {
            let neighbor = lattice.topology().random_neighbor(focal, rng);
            return Some(Mutation::new(focal, lattice.strategy_at(neighbor)));
        }
    } else if payoff > 0.0 && fires(rng, payoff / max_rate) {
        let neighbor = lattice.topology().random_neighbor(focal, rng);
        return Some(Mutation::new(neighbor, lattice.strategy_at(focal)));
    }
    None
}

/// Rule 1. Birth only, at rate `payoff / max_rate`.
pub(super) fn linear_birth_death<R: Rng + ?Sized>(
    lattice: &Lattice,
    focal: usize,
    rng: &mut R,
) -> Option<Mutation> {
    let rate = lattice.payoff_at(focal) / lattice.max_rate();
    if fires(rng, rate) {
        let neighbor = lattice.topology().random_neighbor(focal, rng);
        Some(Mutation::new(neighbor, lattice.strategy_at(focal)))
    } else {
        None
    }
}

/// Rule 4. The focal strategy replaces a neighbour with the lowest payoff,
/// ties broken uniformly.
pub(super) fn least_fit<R: Rng + ?Sized>(
    lattice: &Lattice,
    focal: usize,
    rng: &mut R,
) -> Option<Mutation> {
    let (sites, payoffs) = neighbor_payoffs(lattice, focal);
    let min = payoffs.iter().copied().fold(f64::INFINITY, f64::min);
    let k = draw_until(rng, payoffs.len(), |k| payoffs[k] == min);
    Some(Mutation::new(sites[k], lattice.strategy_at(focal)))
}
