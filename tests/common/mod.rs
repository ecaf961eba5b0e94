pub mod macros;

use evolattice_core::Simulation;
use evolattice_data::{Dimensions, GridSnapshot, LatticeConfig, Strategy};

#[allow(dead_code)]
pub struct LatticeBuilder {
    config: LatticeConfig,
    seed: u64,
    cells: Option<Vec<Strategy>>,
}

#[allow(dead_code)]
impl LatticeBuilder {
    /// A 10x10 torus, two strategies, neutral payoffs, rule 0.
    pub fn new() -> Self {
        Self {
            config: LatticeConfig::two_strategy(10, [[1.0, 1.0], [1.0, 1.0]], 0),
            seed: 42,
            cells: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut LatticeConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn size(mut self, size: usize) -> Self {
        self.config.size = size;
        self
    }

    pub fn rule(mut self, rule: u8) -> Self {
        self.config.update_rule = rule;
        self
    }

    /// Switches to a ring with `range` neighbours on each side.
    pub fn ring(mut self, range: usize) -> Self {
        self.config.dimensions = 1;
        self.config.interaction_range = range;
        self
    }

    pub fn payoff(mut self, rows: &[&[f64]]) -> Self {
        self.config.strategy_count = rows.len();
        self.config.payoff_matrix = rows.iter().map(|r| r.to_vec()).collect();
        if self.config.initial_proportions.len() != rows.len() {
            self.config.initial_proportions = vec![1.0; rows.len()];
        }
        self
    }

    pub fn proportions(mut self, weights: &[f64]) -> Self {
        self.config.initial_proportions = weights.to_vec();
        self
    }

    /// Starts from an explicit grid instead of a random one.
    pub fn cells(mut self, cells: Vec<Strategy>) -> Self {
        self.cells = Some(cells);
        self
    }

    /// Starts from a uniform grid with `ones` set to strategy 1.
    pub fn with_ones(self, ones: &[usize]) -> Self {
        let mut cells = vec![0; self.config.site_count()];
        for &site in ones {
            cells[site] = 1;
        }
        self.cells(cells)
    }

    pub fn config(&self) -> LatticeConfig {
        self.config.clone()
    }

    pub fn build(self) -> Simulation {
        match self.cells {
            Some(cells) => {
                let grid = GridSnapshot {
                    dimensions: Dimensions::from_raw(self.config.dimensions)
                        .expect("builder dimensions"),
                    size: self.config.size as u32,
                    strategy_count: self.config.strategy_count as u8,
                    steps: 0,
                    cells,
                };
                Simulation::restore(&self.config, &grid, Some(self.seed))
                    .expect("Failed to restore lattice in test builder")
            }
            None => Simulation::create(&self.config, Some(self.seed))
                .expect("Failed to create lattice in test builder"),
        }
    }
}
