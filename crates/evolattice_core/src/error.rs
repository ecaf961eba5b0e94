//! Error types for the simulation engine.
//!
//! Configuration problems are always reported before any lattice exists.
//! Lattice errors are raised while stepping and indicate either a caller bug
//! (an out-of-range strategy label) or a degenerate payoff pool.

use evolattice_data::{Strategy, UpdateRule};
use thiserror::Error;

/// A proposed configuration that cannot be simulated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("dimensions must be 1 or 2, got {0}")]
    InvalidDimensions(u8),

    #[error("strategy count must be 2 or 3, got {0}")]
    InvalidStrategyCount(usize),

    #[error("update rule must be between 0 and 7, got {0}")]
    InvalidUpdateRule(u8),

    #[error("interaction range {range} is invalid for a {dimensions}-D lattice of size {size}")]
    InvalidInteractionRange {
        range: usize,
        dimensions: u8,
        size: usize,
    },

    #[error("lattice size {size} is outside {min}..={max}")]
    InvalidSize { size: usize, min: usize, max: usize },

    #[error("payoff matrix is empty or not square")]
    PayoffMatrixNotSquare,

    #[error("payoff matrix side {side} does not match strategy count {strategy_count}")]
    PayoffMatrixShape { side: usize, strategy_count: usize },

    #[error("payoff coefficient [{row}][{col}] is not finite")]
    NonFinitePayoff { row: usize, col: usize },

    #[error("payoff matrix is all zeros, so no rate can be normalised")]
    ZeroPayoffMatrix,

    #[error("initial proportion vector has length {len}, expected {strategy_count}")]
    ProportionLength { len: usize, strategy_count: usize },

    #[error("initial proportion weight for strategy {strategy} is negative or not finite")]
    NegativeProportion { strategy: usize },

    #[error("initial proportion weights sum to zero")]
    ZeroProportions,

    #[error("update rule {rule} cannot use negative payoff coefficient [{row}][{col}] = {value}")]
    NegativePayoff {
        rule: UpdateRule,
        row: usize,
        col: usize,
        value: f64,
    },

    /// Some arrangement of neighbours leaves every payoff in a rule 2/3 pool
    /// at zero, so no replacement could be drawn.
    #[error("update rule {rule} can reach an all-zero payoff pool: coefficient [{row}][{col}] is zero")]
    ZeroPoolReachable { rule: UpdateRule, row: usize, col: usize },

    #[error("grid holds {actual} strategies but the configuration has {expected}")]
    GridStrategyCount { expected: usize, actual: usize },

    #[error("grid is {actual}-D but the configuration is {expected}-D")]
    GridDimensions { expected: u8, actual: u8 },

    #[error("grid has {actual} cells, expected {expected}")]
    GridShape { expected: usize, actual: usize },

    #[error("grid cell {site} holds strategy {strategy}, outside 0..{strategy_count}")]
    GridLabel {
        site: usize,
        strategy: Strategy,
        strategy_count: usize,
    },

    #[error("strategy counts {counts:?} do not match the grid")]
    CountMismatch { counts: Vec<usize> },

    #[error("sweep resolution must be odd, got {0}")]
    EvenResolution(usize),

    #[error("sweep resolution must be positive")]
    ZeroResolution,

    #[error("stop time must be finite and non-negative, got {0}")]
    InvalidStopTime(f64),

    #[error("sweep half-width must be finite and non-negative, got {0}")]
    InvalidHalfWidth(f64),
}

/// Failures raised while mutating or stepping a lattice.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LatticeError {
    /// Writing a label outside `0..strategy_count`. Always a caller bug.
    #[error("strategy {strategy} is outside 0..{strategy_count}")]
    InvariantViolation { strategy: usize, strategy_count: usize },

    /// A payoff pool with no positive mass, so no replacement can be drawn.
    #[error("payoff pool around site {site} sums to {total}, no replacement distribution exists")]
    DegenerateDistribution { site: usize, total: f64 },
}

/// Failures of a phase-diagram sweep.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SweepError {
    #[error("sweep configuration rejected: {0}")]
    Config(#[from] ConfigError),

    #[error("cell ({row}, {col}) rejected: {source}")]
    CellConfig {
        row: usize,
        col: usize,
        #[source]
        source: ConfigError,
    },

    #[error("cell ({row}, {col}) failed: {source}")]
    Cell {
        row: usize,
        col: usize,
        #[source]
        source: LatticeError,
    },

    #[error("sweep cancelled")]
    Cancelled,
}
