//! The work behind each CLI subcommand, kept free of argument parsing so it
//! can be driven from tests.

use anyhow::{Context, Result};
use evolattice_core::{AppConfig, RunOutcome, Simulation, SweepMetrics, SweepPlan};
use evolattice_data::{GridSnapshot, SweepConfig, SweepResult};
use evolattice_io::SweepReport;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

/// Command-line values that replace fields of `[sweep]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepOverrides {
    pub a12: Option<f64>,
    pub a21: Option<f64>,
    pub half_width: Option<f64>,
    pub resolution: Option<usize>,
    pub stop_time: Option<f64>,
    pub update_rule: Option<u8>,
    pub lattice_size: Option<usize>,
    pub max_steps: Option<u64>,
    pub seed: Option<u64>,
}

impl SweepOverrides {
    pub fn apply(&self, sweep: &mut SweepConfig) {
        if let Some(v) = self.a12 {
            sweep.a12 = v;
        }
        if let Some(v) = self.a21 {
            sweep.a21 = v;
        }
        if let Some(v) = self.half_width {
            sweep.half_width = v;
        }
        if let Some(v) = self.resolution {
            sweep.resolution = v;
        }
        if let Some(v) = self.stop_time {
            sweep.stop_time = v;
        }
        if let Some(v) = self.update_rule {
            sweep.update_rule = v;
        }
        if let Some(v) = self.lattice_size {
            sweep.lattice_size = v;
        }
        if self.max_steps.is_some() {
            sweep.max_steps = self.max_steps;
        }
        if self.seed.is_some() {
            sweep.seed = self.seed;
        }
    }
}

/// Command-line values that replace fields of `[run]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOverrides {
    pub seed: Option<u64>,
    pub stop_time: Option<f64>,
    pub max_steps: Option<u64>,
}

impl RunOverrides {
    pub fn apply(&self, config: &mut AppConfig) {
        if self.seed.is_some() {
            config.run.seed = self.seed;
        }
        if let Some(v) = self.stop_time {
            config.run.stop_time = v;
        }
        if self.max_steps.is_some() {
            config.run.max_steps = self.max_steps;
        }
    }
}

/// Validates the `[sweep]` section, runs the sweep and wraps the result in
/// a report.
pub fn execute_sweep(config: AppConfig, cancel: &AtomicBool) -> Result<SweepReport> {
    config.validate_sweep()?;
    let plan = SweepPlan::new(&config.sweep)?;
    tracing::info!(
        rule = %plan.update_rule(),
        resolution = config.sweep.resolution,
        seed = plan.base_seed(),
        "Sweep planned"
    );
    let metrics = SweepMetrics::new();
    let result = plan.run(cancel, &metrics)?;
    Ok(SweepReport::new(config, plan.base_seed(), result))
}

/// Writes the report as JSON and, when asked, the matrix as CSV.
pub fn write_sweep_outputs(
    report: &SweepReport,
    json: Option<&Path>,
    csv: Option<&Path>,
) -> Result<()> {
    if let Some(path) = json {
        ensure_parent(path)?;
        report.save(path)?;
    }
    if let Some(path) = csv {
        ensure_parent(path)?;
        evolattice_io::write_csv(&report.result, path)?;
    }
    Ok(())
}

/// Default report location: `output/sweep.json`, numbered if taken.
#[must_use]
pub fn default_report_path() -> PathBuf {
    evolattice_io::unique_path(Path::new("output/sweep"), "json")
}

/// Human-readable phase diagram for the terminal.
#[must_use]
pub fn format_matrix(result: &SweepResult) -> String {
    let mut out = format!("{:>9}", "a11\\a22");
    for y in &result.y_range {
        let _ = write!(out, " {y:>8.3}");
    }
    out.push('\n');
    for (x, row) in result.x_range.iter().zip(&result.proportions) {
        let _ = write!(out, "{x:>9.3}");
        for p in row {
            let _ = write!(out, " {p:>8.4}");
        }
        out.push('\n');
    }
    out
}

/// Runs the `[lattice]` configuration once, optionally resuming from a
/// saved grid, and returns the outcome with the final grid.
pub fn execute_run(
    config: &AppConfig,
    resume_from: Option<&Path>,
    cancel: &AtomicBool,
) -> Result<(RunOutcome, GridSnapshot)> {
    config.validate_run()?;
    let mut sim = match resume_from {
        Some(path) => {
            let grid = evolattice_io::load_snapshot(path)?;
            Simulation::restore(&config.lattice, &grid, config.run.seed)
                .with_context(|| format!("snapshot {} does not fit [lattice]", path.display()))?
        }
        None => Simulation::create(&config.lattice, config.run.seed)?,
    };
    let outcome = sim.run_until(&config.run.stop_condition(), cancel)?;
    tracing::info!(
        steps = outcome.steps,
        time = outcome.time,
        reason = ?outcome.reason,
        "Run finished"
    );
    Ok((outcome, sim.grid_snapshot()))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}
