//! The eight stochastic update rules.
//!
//! Each rule looks at the lattice around a focal site and proposes at most
//! one [`Mutation`]; it never writes to the lattice itself. [`apply`] is the
//! only place that turns a proposal into a write.

mod best_response;
mod birth_death;
mod death_birth;

use crate::error::LatticeError;
use crate::lattice::Lattice;
use evolattice_data::{Strategy, UpdateRule};
use rand::Rng;

/// A single write: `site` takes `strategy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mutation {
    pub site: usize,
    pub strategy: Strategy,
}

impl Mutation {
    #[must_use]
    pub fn new(site: usize, strategy: Strategy) -> Self {
        Self { site, strategy }
    }
}

/// What `rule` would do at `focal`, drawing randomness from `rng`.
pub fn propose<R: Rng + ?Sized>(
    rule: UpdateRule,
    lattice: &Lattice,
    focal: usize,
    rng: &mut R,
) -> Result<Option<Mutation>, LatticeError> {
    let mutation = match rule {
        UpdateRule::PayoffBirthDeath => birth_death::payoff_birth_death(lattice, focal, rng),
        UpdateRule::LinearBirthDeath => birth_death::linear_birth_death(lattice, focal, rng),
        UpdateRule::DeathBirth => death_birth::death_birth(lattice, focal, false, rng)?,
        UpdateRule::Imitation => death_birth::death_birth(lattice, focal, true, rng)?,
        UpdateRule::BirthDeathLeastFit => birth_death::least_fit(lattice, focal, rng),
        UpdateRule::DeathBirthFittest => death_birth::fittest_neighbor(lattice, focal, rng),
        UpdateRule::ImitationFittest => death_birth::imitate_fittest(lattice, focal, rng),
        UpdateRule::BestResponse => best_response::best_response(lattice, focal, rng),
    };
    Ok(mutation)
}

/// Proposes and applies one update at `focal`.
pub fn apply<R: Rng + ?Sized>(
    rule: UpdateRule,
    lattice: &mut Lattice,
    focal: usize,
    rng: &mut R,
) -> Result<Option<Mutation>, LatticeError> {
    let mutation = propose(rule, lattice, focal, rng)?;
    if let Some(m) = mutation {
        lattice.set_strategy(m.site, m.strategy)?;
    }
    Ok(mutation)
}

/// Neighbour sites of `focal` with their current payoffs, in topology order.
pub(crate) fn neighbor_payoffs(lattice: &Lattice, focal: usize) -> (Vec<usize>, Vec<f64>) {
    let sites: Vec<usize> = lattice.topology().neighbors(focal).collect();
    let payoffs = sites.iter().map(|&n| lattice.payoff_at(n)).collect();
    (sites, payoffs)
}

/// Bernoulli trial with success probability `rate`.
#[inline]
pub(crate) fn fires<R: Rng + ?Sized>(rng: &mut R, rate: f64) -> bool {
    rng.gen::<f64>() < rate
}

/// Redraws uniform indices in `0..len` until `accept` holds.
///
/// Callers must guarantee that at least one index is accepted.
pub(crate) fn draw_until<R, F>(rng: &mut R, len: usize, mut accept: F) -> usize
where
    R: Rng + ?Sized,
    F: FnMut(usize) -> bool,
{
    loop {
        let k = rng.gen_range(0..len);
        if accept(k) {
            return k;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::torus_with;
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_apply_writes_through_counts() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut lattice = torus_with(5, [[1.0, 1.0], [1.0, 1.0]], 5, &[7]);
        // Site 12 has neighbour 7 as the only strategy-1 site; all payoffs tie at 4.
        for _ in 0..50 {
            apply(UpdateRule::DeathBirthFittest, &mut lattice, 12, &mut rng).unwrap();
            assert!(lattice.check_consistency().is_ok());
        }
    }

    #[test]
    fn test_propose_does_not_mutate() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let lattice = torus_with(5, [[3.0, 0.0], [5.0, 1.0]], 0, &[6, 7, 8]);
        let before = lattice.clone();
        for rule in UpdateRule::ALL {
            if rule.requires_non_negative_payoffs() {
                continue;
            }
            let _ = propose(rule, &lattice, 12, &mut rng).unwrap();
        }
        assert_eq!(lattice, before);
    }

    #[test]
    fn test_draw_until_finds_only_target() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        for _ in 0..100 {
            assert_eq!(draw_until(&mut rng, 4, |k| k == 2), 2);
        }
    }
}
