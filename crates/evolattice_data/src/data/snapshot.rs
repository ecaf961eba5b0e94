use crate::data::rule::Dimensions;
use crate::Strategy;
use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};

/// Read-only copy of a lattice's strategy grid.
///
/// Cells are stored row-major; a ring is a single row of `size` cells.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Archive, RkyvSerialize, RkyvDeserialize,
)]
#[archive(check_bytes)]
pub struct GridSnapshot {
    pub dimensions: Dimensions,
    pub size: u32,
    pub strategy_count: u8,
    /// Elementary steps applied when the snapshot was taken.
    pub steps: u64,
    pub cells: Vec<Strategy>,
}

impl GridSnapshot {
    /// Strategy in row `row`, column `col`. Rings only have row 0.
    #[must_use]
    pub fn strategy_at(&self, row: usize, col: usize) -> Option<Strategy> {
        let size = self.size as usize;
        if col >= size {
            return None;
        }
        match self.dimensions {
            Dimensions::One if row == 0 => self.cells.get(col).copied(),
            Dimensions::One => None,
            Dimensions::Two if row < size => self.cells.get(row * size + col).copied(),
            Dimensions::Two => None,
        }
    }

    /// Occupancy of each strategy, recomputed from the cells.
    #[must_use]
    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0; usize::from(self.strategy_count)];
        for &cell in &self.cells {
            if let Some(c) = counts.get_mut(usize::from(cell)) {
                *c += 1;
            }
        }
        counts
    }

    #[must_use]
    pub fn proportion_of(&self, strategy: Strategy) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        let count = self.cells.iter().filter(|&&c| c == strategy).count();
        count as f64 / self.cells.len() as f64
    }

    /// Rows of the grid, for collaborators that draw or print it.
    pub fn rows(&self) -> impl Iterator<Item = &[Strategy]> {
        let width = (self.size as usize).max(1);
        self.cells.chunks(width)
    }
}

/// Why a simulation run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Simulated time passed the configured stop time.
    StopTime,
    /// One strategy occupies every site.
    Absorbed,
    /// The elementary step ceiling was hit first.
    MaxSteps,
    Cancelled,
}

/// Outcome of one phase-diagram cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepCell {
    pub row: usize,
    pub col: usize,
    /// `payoff[0][0]` used for this cell.
    pub a11: f64,
    /// `payoff[1][1]` used for this cell.
    pub a22: f64,
    /// Final proportion of strategy 0.
    pub proportion: f64,
    pub steps: u64,
    pub time: f64,
    pub reason: StopReason,
}

/// Phase diagram produced by a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    pub resolution: usize,
    /// Values of `payoff[0][0]`, indexed by row.
    pub x_range: Vec<f64>,
    /// Values of `payoff[1][1]`, indexed by column.
    pub y_range: Vec<f64>,
    /// `proportions[i][j]` is the final share of strategy 0 for `(x_range[i], y_range[j])`.
    pub proportions: Vec<Vec<f64>>,
    /// Per-cell details in row-major order.
    pub cells: Vec<SweepCell>,
}

impl SweepResult {
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&SweepCell> {
        self.cells.get(row * self.resolution + col)
    }
}
