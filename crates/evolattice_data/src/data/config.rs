use serde::{Deserialize, Serialize};

/// A proposed lattice configuration, as read from a file or the command line.
///
/// Fields are kept in their raw form so that every inconsistency can be
/// reported by the validator in `evolattice_core`; nothing here is trusted
/// until it has been validated.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LatticeConfig {
    /// Side of the square torus, or number of sites on the ring.
    pub size: usize,
    /// 1 (ring) or 2 (torus).
    pub dimensions: u8,
    /// 2 or 3.
    pub strategy_count: usize,
    /// Neighbours on each side in 1-D. Must be 1 in 2-D.
    pub interaction_range: usize,
    /// Update rule selector, `0..=7`.
    pub update_rule: u8,
    /// Unnormalised weights for the initial strategy draw.
    pub initial_proportions: Vec<f64>,
    /// `payoff_matrix[i][j]` is what strategy `i` earns against strategy `j`.
    pub payoff_matrix: Vec<Vec<f64>>,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            size: 100,
            dimensions: 2,
            strategy_count: 3,
            interaction_range: 1,
            update_rule: 0,
            initial_proportions: vec![1.0; 3],
            payoff_matrix: vec![vec![1.0; 3]; 3],
        }
    }
}

impl LatticeConfig {
    /// A 2-strategy torus with equal initial proportions.
    #[must_use]
    pub fn two_strategy(size: usize, payoff_matrix: [[f64; 2]; 2], update_rule: u8) -> Self {
        Self {
            size,
            dimensions: 2,
            strategy_count: 2,
            interaction_range: 1,
            update_rule,
            initial_proportions: vec![1.0, 1.0],
            payoff_matrix: payoff_matrix.iter().map(|row| row.to_vec()).collect(),
        }
    }

    /// Total number of sites the configuration describes.
    #[must_use]
    pub fn site_count(&self) -> usize {
        if self.dimensions == 1 {
            self.size
        } else {
            self.size * self.size
        }
    }
}

/// Parameters of a phase-diagram sweep over the diagonal payoff entries.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SweepConfig {
    /// Fixed off-diagonal coefficient `payoff[0][1]`, also the centre of the row range.
    pub a12: f64,
    /// Fixed off-diagonal coefficient `payoff[1][0]`, also the centre of the column range.
    pub a21: f64,
    /// Each range spans `centre ± half_width`.
    pub half_width: f64,
    /// Points per axis. Must be odd so the centre is sampled.
    pub resolution: usize,
    /// Simulated time after which a cell stops.
    pub stop_time: f64,
    pub update_rule: u8,
    pub lattice_size: usize,
    /// Hard ceiling on elementary steps per cell.
    pub max_steps: Option<u64>,
    pub seed: Option<u64>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            a12: 2.0,
            a21: 3.0,
            half_width: 5.0,
            resolution: 3,
            stop_time: 100.0,
            update_rule: 0,
            lattice_size: 100,
            max_steps: None,
            seed: None,
        }
    }
}
