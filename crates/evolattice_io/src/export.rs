//! Sweep reports and phase-diagram exports.

use crate::error::{IoError, Result};
use crate::serialization::{read_json_file, write_json_file};
use chrono::{DateTime, Utc};
use evolattice_core::AppConfig;
use evolattice_data::SweepResult;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Everything needed to reproduce and audit one sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub run_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// [`AppConfig::fingerprint`] of `config` when the report was written.
    pub fingerprint: String,
    /// Base seed the cell seeds were derived from.
    pub base_seed: u64,
    pub config: AppConfig,
    pub result: SweepResult,
}

impl SweepReport {
    #[must_use]
    pub fn new(config: AppConfig, base_seed: u64, result: SweepResult) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            created_at: Utc::now(),
            fingerprint: config.fingerprint(),
            base_seed,
            config,
            result,
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_json_file(self, &path)?;
        tracing::info!(path = ?path.as_ref(), run_id = %self.run_id, "Sweep report written");
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        read_json_file(path)
    }

    /// Checks that the report is internally consistent: the fingerprint
    /// matches the embedded config, the matrix is `R x R`, every value is a
    /// proportion, and the per-cell details agree with the matrix.
    pub fn check(&self) -> Result<()> {
        if self.fingerprint != self.config.fingerprint() {
            return Err(IoError::validation("fingerprint does not match the embedded config"));
        }
        let r = self.result.resolution;
        if r != self.config.sweep.resolution {
            return Err(IoError::validation(format!(
                "resolution {} differs from configured {}",
                r, self.config.sweep.resolution
            )));
        }
        if self.result.x_range.len() != r || self.result.y_range.len() != r {
            return Err(IoError::validation("parameter ranges do not match the resolution"));
        }
        if self.result.proportions.len() != r
            || self.result.proportions.iter().any(|row| row.len() != r)
        {
            return Err(IoError::validation(format!("proportion matrix is not {r}x{r}")));
        }
        for (i, row) in self.result.proportions.iter().enumerate() {
            for (j, &p) in row.iter().enumerate() {
                if !(0.0..=1.0).contains(&p) {
                    return Err(IoError::validation(format!(
                        "cell ({i}, {j}) holds {p}, outside [0, 1]"
                    )));
                }
            }
        }
        if self.result.cells.len() != r * r {
            return Err(IoError::validation(format!(
                "expected {} cell records, found {}",
                r * r,
                self.result.cells.len()
            )));
        }
        for cell in &self.result.cells {
            let expected = self
                .result
                .proportions
                .get(cell.row)
                .and_then(|row| row.get(cell.col));
            if expected != Some(&cell.proportion) {
                return Err(IoError::validation(format!(
                    "cell record ({}, {}) disagrees with the matrix",
                    cell.row, cell.col
                )));
            }
        }
        Ok(())
    }
}

/// Renders the proportion matrix as CSV: a header of `payoff[1][1]` values,
/// then one line per `payoff[0][0]` value.
#[must_use]
pub fn matrix_to_csv(result: &SweepResult) -> String {
    let mut out = String::from("a11\\a22");
    for y in &result.y_range {
        let _ = write!(out, ",{y}");
    }
    out.push('\n');
    for (x, row) in result.x_range.iter().zip(&result.proportions) {
        let _ = write!(out, "{x}");
        for p in row {
            let _ = write!(out, ",{p}");
        }
        out.push('\n');
    }
    out
}

pub fn write_csv<P: AsRef<Path>>(result: &SweepResult, path: P) -> Result<()> {
    std::fs::write(&path, matrix_to_csv(result)).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("writing CSV to {:?}", path.as_ref()))
    })
}

/// `stem.ext`, or the first of `stem1.ext`, `stem2.ext`, ... that does not
/// exist yet.
#[must_use]
pub fn unique_path(stem: &Path, extension: &str) -> PathBuf {
    let candidate = |suffix: String| {
        let mut name = stem.as_os_str().to_owned();
        name.push(suffix);
        name.push(".");
        name.push(extension);
        PathBuf::from(name)
    };
    let mut path = candidate(String::new());
    let mut i = 1u32;
    while path.exists() {
        path = candidate(i.to_string());
        i += 1;
    }
    path
}
