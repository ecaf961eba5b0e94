//! # Evolattice IO
//!
//! Export and persistence layer for the lattice simulator.
//!
//! This crate provides:
//! - Structured error handling with custom error types
//! - JSON helpers with transparent gzip for `.gz` paths
//! - Sweep reports and CSV export of phase diagrams
//! - Binary grid snapshots via rkyv

/// Error types and result aliases for I/O operations
pub mod error;
/// Sweep reports, CSV export and output path selection
pub mod export;
/// rkyv grid snapshots
pub mod persistence;
/// JSON (optionally gzip) helpers
pub mod serialization;

pub use error::{IoError, Result};
pub use export::{matrix_to_csv, unique_path, write_csv, SweepReport};
pub use persistence::{load_snapshot, save_snapshot};
pub use serialization::{from_json, read_json_file, to_json, to_json_pretty, write_json_file};
