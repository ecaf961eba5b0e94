//! Plain data shared by the evolattice crates.
//!
//! Nothing in here knows how to simulate; the engine lives in
//! `evolattice_core` and attaches behaviour through its own modules.

pub mod data;

pub use data::config::{LatticeConfig, SweepConfig};
pub use data::rule::{Dimensions, UpdateRule};
pub use data::snapshot::{GridSnapshot, StopReason, SweepCell, SweepResult};

/// A strategy label. Always in `0..strategy_count`.
pub type Strategy = u8;
