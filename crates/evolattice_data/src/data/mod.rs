//! Core data structures for lattice game simulations.

pub mod config;
pub mod rule;
pub mod snapshot;
