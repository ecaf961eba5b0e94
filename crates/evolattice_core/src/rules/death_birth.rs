//! Rules where the focal site is replaced from its neighbourhood.

use super::{draw_until, neighbor_payoffs, Mutation};
use crate::error::LatticeError;
use crate::lattice::Lattice;
use crate::sampler::CumulativeWeights;
use evolattice_data::Strategy;
use rand::Rng;

/// Rules 2 and 3. The focal site takes a strategy drawn in proportion to the
/// payoff pooled by each strategy among its neighbours. With `include_self`
/// the focal site's own payoff joins its strategy's pool.
pub(super) fn death_birth<R: Rng + ?Sized>(
    lattice: &Lattice,
    focal: usize,
    include_self: bool,
    rng: &mut R,
) -> Result<Option<Mutation>, LatticeError> {
    let mut pools = vec![0.0; lattice.strategy_count()];
    for n in lattice.topology().neighbors(focal) {
        pools[usize::from(lattice.strategy_at(n))] += lattice.payoff_at(n);
    }
    if include_self {
        pools[usize::from(lattice.strategy_at(focal))] += lattice.payoff_at(focal);
    }

    let dist = CumulativeWeights::new(&pools).ok_or_else(|| LatticeError::DegenerateDistribution {
        site: focal,
        total: pools.iter().sum(),
    })?;
    let strategy = dist.draw(rng) as Strategy;
    Ok(Some(Mutation::new(focal, strategy)))
}

/// Rule 5. The focal site adopts the strategy of a neighbour with the highest
/// payoff, ties broken uniformly.
pub(super) fn fittest_neighbor<R: Rng + ?Sized>(
    lattice: &Lattice,
    focal: usize,
    rng: &mut R,
) -> Option<Mutation> {
    let (sites, payoffs) = neighbor_payoffs(lattice, focal);
    let max = payoffs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let k = draw_until(rng, payoffs.len(), |k| payoffs[k] == max);
    Some(Mutation::new(focal, lattice.strategy_at(sites[k])))
}

/// Rule 6. As rule 5, but the focal site competes too; drawing itself keeps
/// its current strategy.
pub(super) fn imitate_fittest<R: Rng + ?Sized>(
    lattice: &Lattice,
    focal: usize,
    rng: &mut R,
) -> Option<Mutation> {
    let (sites, payoffs) = neighbor_payoffs(lattice, focal);
    let own = lattice.payoff_at(focal);
    let max = payoffs.iter().copied().fold(own, f64::max);
    let candidates = payoffs.len() + 1;
    let k = draw_until(rng, candidates, |k| match payoffs.get(k) {
        Some(&p) => p == max,
        None => own == max,
    });
    sites
        .get(k)
        .map(|&site| Mutation::new(focal, lattice.strategy_at(site)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{torus, torus_with};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    // Site 12 on a 5x5 torus has neighbours 7, 13, 17 and 11.

    #[test]
    fn test_death_birth_excludes_focal_payoff() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        // Focal is strategy 1, all neighbours are 0: only strategy 0 has a pool.
        let lattice = torus_with(5, [[1.0, 1.0], [9.0, 9.0]], 2, &[12]);
        for _ in 0..200 {
            let m = death_birth(&lattice, 12, false, &mut rng).unwrap().unwrap();
            assert_eq!(m, Mutation::new(12, 0));
        }
    }

    #[test]
    fn test_imitation_includes_focal_payoff() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let lattice = torus_with(5, [[1.0, 1.0], [9.0, 9.0]], 3, &[12]);
        let n = 20_000;
        let kept = (0..n)
            .filter(|_| death_birth(&lattice, 12, true, &mut rng).unwrap().unwrap().strategy == 1)
            .count();
        // Neighbour pool: 4 sites each earning 3 * 1 + 1 = 4 → 16. Own pool: 36.
        let expected = 36.0 / 52.0;
        let share = kept as f64 / n as f64;
        assert!((share - expected).abs() < 0.015, "kept share was {share}");
    }

    #[test]
    fn test_zero_pool_is_degenerate() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        // Validation keeps such matrices away from rule 2; build under rule 0.
        let lattice = torus_with(5, [[0.0, 0.0], [0.0, 1.0]], 0, &[]);
        let err = death_birth(&lattice, 12, false, &mut rng).unwrap_err();
        assert!(matches!(err, LatticeError::DegenerateDistribution { site: 12, .. }));
    }

    #[test]
    fn test_fittest_neighbor_copies_maximum() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        // Neighbour 17 is strategy 1 and earns 4 * 5 = 20.
        let lattice = torus_with(5, [[1.0, 0.0], [5.0, 1.0]], 5, &[17]);
        for _ in 0..100 {
            assert_eq!(
                fittest_neighbor(&lattice, 12, &mut rng),
                Some(Mutation::new(12, 1))
            );
        }
    }

    #[test]
    fn test_imitate_fittest_keeps_self_when_best() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let lattice = torus_with(5, [[1.0, 0.0], [5.0, 1.0]], 6, &[12]);
        for _ in 0..100 {
            assert_eq!(imitate_fittest(&lattice, 12, &mut rng), None);
        }
    }

    #[test]
    fn test_imitate_fittest_tie_includes_self() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let lattice = torus(5, [[1.0, 1.0], [1.0, 1.0]], 6, vec![0; 25]);
        let n = 10_000;
        let stayed = (0..n)
            .filter(|_| imitate_fittest(&lattice, 12, &mut rng).is_none())
            .count();
        let share = stayed as f64 / n as f64;
        assert!((share - 0.2).abs() < 0.02, "self share was {share}");
    }
}
