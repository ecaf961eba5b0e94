//! Phase-diagram sweep over the diagonal payoff entries.
//!
//! Each of the `R x R` cells is an independent run on its own lattice with
//! its own random source, so cells can be spread across threads without
//! any shared mutable state. Results land in disjoint output slots.

use crate::error::SweepError;
use crate::metrics::SweepMetrics;
use crate::simulation::{Simulation, StopCondition};
use crate::validation::{validate_config, validate_sweep};
use evolattice_data::{LatticeConfig, StopReason, SweepCell, SweepConfig, SweepResult, UpdateRule};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// `resolution` evenly spaced values covering `centre ± half_width`.
///
/// A resolution of 1 yields only the centre.
#[must_use]
pub fn parameter_range(centre: f64, half_width: f64, resolution: usize) -> Vec<f64> {
    if resolution <= 1 {
        return vec![centre; resolution];
    }
    let step = 2.0 * half_width / (resolution - 1) as f64;
    (0..resolution)
        .map(|i| centre - half_width + i as f64 * step)
        .collect()
}

/// Seed for cell `index`, derived from the sweep's base seed.
#[must_use]
pub fn cell_seed(base: u64, index: usize) -> u64 {
    splitmix64(base ^ index as u64)
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// A validated sweep: parameter ranges plus the configuration of every cell.
#[derive(Debug, Clone)]
pub struct SweepPlan {
    rule: UpdateRule,
    resolution: usize,
    x_range: Vec<f64>,
    y_range: Vec<f64>,
    cells: Vec<LatticeConfig>,
    stop: StopCondition,
    base_seed: u64,
}

impl SweepPlan {
    /// Checks the sweep parameters, then every cell's lattice configuration.
    /// Nothing runs unless all cells pass.
    pub fn new(config: &SweepConfig) -> Result<Self, SweepError> {
        let rule = validate_sweep(config)?;
        let resolution = config.resolution;
        let x_range = parameter_range(config.a12, config.half_width, resolution);
        let y_range = parameter_range(config.a21, config.half_width, resolution);

        let mut cells = Vec::with_capacity(resolution * resolution);
        for (row, &a11) in x_range.iter().enumerate() {
            for (col, &a22) in y_range.iter().enumerate() {
                let lattice = LatticeConfig::two_strategy(
                    config.lattice_size,
                    [[a11, config.a12], [config.a21, a22]],
                    rule.index(),
                );
                validate_config(&lattice)
                    .map_err(|source| SweepError::CellConfig { row, col, source })?;
                cells.push(lattice);
            }
        }

        Ok(Self {
            rule,
            resolution,
            x_range,
            y_range,
            cells,
            stop: StopCondition::at_time(config.stop_time).with_max_steps(config.max_steps),
            base_seed: config.seed.unwrap_or_else(rand::random),
        })
    }

    #[must_use]
    pub fn update_rule(&self) -> UpdateRule {
        self.rule
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn x_range(&self) -> &[f64] {
        &self.x_range
    }

    #[must_use]
    pub fn y_range(&self) -> &[f64] {
        &self.y_range
    }

    #[must_use]
    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Lattice configuration of cell `(row, col)`.
    #[must_use]
    pub fn cell_config(&self, row: usize, col: usize) -> Option<&LatticeConfig> {
        if row >= self.resolution || col >= self.resolution {
            return None;
        }
        self.cells.get(row * self.resolution + col)
    }

    /// Runs every cell and assembles the phase diagram.
    pub fn run(&self, cancel: &AtomicBool, metrics: &SweepMetrics) -> Result<SweepResult, SweepError> {
        metrics.begin(self.cell_count());

        #[cfg(feature = "parallel")]
        let cells: Result<Vec<SweepCell>, SweepError> = (0..self.cell_count())
            .into_par_iter()
            .map(|index| self.run_cell(index, cancel, metrics))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let cells: Result<Vec<SweepCell>, SweepError> = (0..self.cell_count())
            .map(|index| self.run_cell(index, cancel, metrics))
            .collect();

        let cells = cells?;
        if cancel.load(Ordering::Relaxed) || cells.iter().any(|c| c.reason == StopReason::Cancelled) {
            return Err(SweepError::Cancelled);
        }
        metrics.log_summary();

        let proportions = cells
            .chunks(self.resolution)
            .map(|row| row.iter().map(|c| c.proportion).collect())
            .collect();
        Ok(SweepResult {
            resolution: self.resolution,
            x_range: self.x_range.clone(),
            y_range: self.y_range.clone(),
            proportions,
            cells,
        })
    }

    fn run_cell(
        &self,
        index: usize,
        cancel: &AtomicBool,
        metrics: &SweepMetrics,
    ) -> Result<SweepCell, SweepError> {
        let row = index / self.resolution;
        let col = index % self.resolution;
        let config = &self.cells[index];
        let started = Instant::now();

        let mut sim = Simulation::create(config, Some(cell_seed(self.base_seed, index)))
            .map_err(|source| SweepError::CellConfig { row, col, source })?;
        let outcome = sim
            .run_until(&self.stop, cancel)
            .map_err(|source| SweepError::Cell { row, col, source })?;

        metrics.record_cell(started.elapsed(), outcome.steps, outcome.reason);
        Ok(SweepCell {
            row,
            col,
            a11: self.x_range[row],
            a22: self.y_range[col],
            proportion: sim.proportion(0),
            steps: outcome.steps,
            time: outcome.time,
            reason: outcome.reason,
        })
    }
}

/// Runs a sweep to completion with fresh metrics and no cancellation.
pub fn run_sweep(config: &SweepConfig) -> Result<SweepResult, SweepError> {
    run_sweep_with(config, &AtomicBool::new(false), &SweepMetrics::new())
}

/// Runs a sweep, checking `cancel` between elementary steps of every cell.
pub fn run_sweep_with(
    config: &SweepConfig,
    cancel: &AtomicBool,
    metrics: &SweepMetrics,
) -> Result<SweepResult, SweepError> {
    SweepPlan::new(config)?.run(cancel, metrics)
}
