pub mod commands;
pub mod shutdown;

pub use commands::{
    default_report_path, execute_run, execute_sweep, format_matrix, write_sweep_outputs,
    RunOverrides, SweepOverrides,
};
pub use shutdown::ShutdownManager;
