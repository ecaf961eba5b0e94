//! # Evolattice Core
//!
//! The simulation engine for spatial evolutionary games on a ring or a
//! square torus.
//!
//! This crate contains:
//! - Neighbour enumeration for both geometries
//! - A weighted sampler for categorical draws
//! - Lattice state with payoff computation and maintained strategy counts
//! - The eight stochastic update rules
//! - A validator that every configuration passes before use
//! - Single-run simulation handles and the parallel phase-diagram sweep
//! - TOML configuration, metrics and structured logging
//!
//! ## Example
//!
//! ```
//! use evolattice_core::simulation::{Simulation, StopCondition};
//! use evolattice_data::LatticeConfig;
//! use std::sync::atomic::AtomicBool;
//!
//! // Prisoner's-dilemma-like payoffs under death-birth updating.
//! let config = LatticeConfig::two_strategy(20, [[3.0, 0.5], [5.0, 1.0]], 2);
//! let mut sim = Simulation::create(&config, Some(42)).unwrap();
//! let outcome = sim
//!     .run_until(&StopCondition::at_time(1.0), &AtomicBool::new(false))
//!     .unwrap();
//! assert!((0.0..=1.0).contains(&outcome.proportions[0]));
//! ```

/// Application configuration (TOML)
pub mod config;
/// Error types for configuration, lattice and sweep failures
pub mod error;
/// Lattice state and payoff computation
pub mod lattice;
/// Sweep metrics and logging setup
pub mod metrics;
/// Square payoff matrix
pub mod payoff;
/// The eight update rules
pub mod rules;
/// Categorical sampling from unnormalised weights
pub mod sampler;
/// Single simulation runs
pub mod simulation;
/// Phase-diagram sweep driver
pub mod sweep;
/// Ring and torus neighbourhoods
pub mod topology;
/// Configuration checks
pub mod validation;

pub use config::{AppConfig, RunConfig};
pub use error::{ConfigError, LatticeError, SweepError};
pub use lattice::Lattice;
pub use metrics::{init_logging, SweepMetrics};
pub use simulation::{RunOutcome, Simulation, StopCondition};
pub use sweep::{run_sweep, run_sweep_with, SweepPlan};
pub use validation::{validate_config, ValidatedConfig};
