//! Batch driver for the evolattice lattice simulator.
//!
//! The engine lives in `evolattice_core`; this crate wires configuration,
//! cancellation and export together for the `evolattice` binary.

pub mod app;

pub use app::{execute_run, execute_sweep, ShutdownManager};
