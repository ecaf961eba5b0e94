//! Lattice state: the strategy grid, the payoff matrix and occupancy counts.
//!
//! Every write to the grid goes through [`Lattice::set_strategy`], which keeps
//! the count vector in step with the cells.

use crate::error::{ConfigError, LatticeError};
use crate::payoff::PayoffMatrix;
use crate::sampler::CumulativeWeights;
use crate::topology::Topology;
use crate::validation::{self, ValidatedConfig};
use evolattice_data::{Dimensions, GridSnapshot, Strategy};
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    topology: Topology,
    dimensions: Dimensions,
    strategy_count: usize,
    payoff: PayoffMatrix,
    cells: Vec<Strategy>,
    counts: Vec<usize>,
}

impl Lattice {
    /// Populates every site independently from the configured initial
    /// proportions.
    pub fn new<R: Rng + ?Sized>(config: &ValidatedConfig, rng: &mut R) -> Result<Self, ConfigError> {
        let dist = CumulativeWeights::new(config.initial_proportions())
            .ok_or(ConfigError::ZeroProportions)?;
        let topology = config.topology();
        let strategy_count = config.strategy_count();

        let mut cells = Vec::with_capacity(topology.site_count());
        let mut counts = vec![0; strategy_count];
        for _ in 0..topology.site_count() {
            let strategy = dist.draw(rng);
            counts[strategy] += 1;
            cells.push(strategy as Strategy);
        }

        Ok(Self {
            topology,
            dimensions: config.dimensions(),
            strategy_count,
            payoff: config.payoff().clone(),
            cells,
            counts,
        })
    }

    /// Rebuilds a lattice around an existing grid.
    pub fn from_snapshot(config: &ValidatedConfig, grid: &GridSnapshot) -> Result<Self, ConfigError> {
        validation::validate_grid(config, grid)?;
        let strategy_count = config.strategy_count();
        let mut counts = vec![0; strategy_count];
        for &cell in &grid.cells {
            counts[usize::from(cell)] += 1;
        }
        Ok(Self {
            topology: config.topology(),
            dimensions: config.dimensions(),
            strategy_count,
            payoff: config.payoff().clone(),
            cells: grid.cells.clone(),
            counts,
        })
    }

    #[must_use]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[must_use]
    pub fn site_count(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn strategy_count(&self) -> usize {
        self.strategy_count
    }

    #[must_use]
    pub fn payoff_matrix(&self) -> &PayoffMatrix {
        &self.payoff
    }

    #[inline]
    #[must_use]
    pub fn strategy_at(&self, site: usize) -> Strategy {
        self.cells[site]
    }

    /// Sum of the site's payoff against each of its neighbours.
    #[inline]
    #[must_use]
    pub fn payoff_at(&self, site: usize) -> f64 {
        self.payoff_if(site, self.cells[site])
    }

    /// Payoff the site would earn if it held `strategy`, neighbours unchanged.
    #[must_use]
    pub fn payoff_if(&self, site: usize, strategy: Strategy) -> f64 {
        self.topology
            .neighbors(site)
            .map(|n| self.payoff.get(strategy, self.cells[n]))
            .sum()
    }

    /// Upper bound on any site's absolute payoff: neighbour count times the
    /// largest absolute payoff coefficient.
    #[must_use]
    pub fn max_rate(&self) -> f64 {
        self.topology.neighbor_count() as f64 * self.payoff.max_abs()
    }

    /// Writes `strategy` at `site`, moving one unit between the counts.
    pub fn set_strategy(&mut self, site: usize, strategy: Strategy) -> Result<(), LatticeError> {
        let new = usize::from(strategy);
        if new >= self.strategy_count {
            return Err(LatticeError::InvariantViolation {
                strategy: new,
                strategy_count: self.strategy_count,
            });
        }
        let old = usize::from(self.cells[site]);
        self.counts[old] -= 1;
        self.cells[site] = strategy;
        self.counts[new] += 1;
        Ok(())
    }

    #[must_use]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    #[must_use]
    pub fn count_of(&self, strategy: Strategy) -> usize {
        self.counts.get(usize::from(strategy)).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn proportion_of(&self, strategy: Strategy) -> f64 {
        self.count_of(strategy) as f64 / self.site_count() as f64
    }

    #[must_use]
    pub fn proportions(&self) -> Vec<f64> {
        let total = self.site_count() as f64;
        self.counts.iter().map(|&c| c as f64 / total).collect()
    }

    /// One strategy holds every site.
    #[must_use]
    pub fn is_absorbed(&self) -> bool {
        self.counts.iter().any(|&c| c == self.site_count())
    }

    #[must_use]
    pub fn cells(&self) -> &[Strategy] {
        &self.cells
    }

    #[must_use]
    pub fn snapshot(&self, steps: u64) -> GridSnapshot {
        GridSnapshot {
            dimensions: self.dimensions,
            size: self.topology.size() as u32,
            strategy_count: self.strategy_count as u8,
            steps,
            cells: self.cells.clone(),
        }
    }

    /// Recounts the grid and compares with the maintained counts.
    pub fn check_consistency(&self) -> Result<(), ConfigError> {
        validation::validate_counts(&self.cells, &self.counts, self.strategy_count)
    }
}
