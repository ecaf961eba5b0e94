//! Application configuration loaded from `evolattice.toml`.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. The TOML file (overrides defaults, section by section)
//! 3. Command-line flags (applied by the binary)
//!
//! ## Example `evolattice.toml`
//!
//! ```toml
//! [lattice]
//! size = 50
//! dimensions = 2
//! strategy_count = 2
//! update_rule = 2
//! initial_proportions = [1.0, 1.0]
//! payoff_matrix = [[1.0, 0.5], [2.0, 1.0]]
//!
//! [run]
//! seed = 42
//! stop_time = 20.0
//!
//! [sweep]
//! a12 = 2.0
//! a21 = 3.0
//! resolution = 5
//! ```

use crate::simulation::StopCondition;
use crate::validation::{validate_config, validate_sweep};
use anyhow::Context;
use evolattice_data::{LatticeConfig, SweepConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for a single `run`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    pub seed: Option<u64>,
    /// Simulated time limit. A negative value means no limit.
    pub stop_time: f64,
    pub max_steps: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: None,
            stop_time: 100.0,
            max_steps: None,
        }
    }
}

impl RunConfig {
    #[must_use]
    pub fn stop_condition(&self) -> StopCondition {
        StopCondition {
            stop_time: (self.stop_time >= 0.0).then_some(self.stop_time),
            max_steps: self.max_steps,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub lattice: LatticeConfig,
    pub run: RunConfig,
    pub sweep: SweepConfig,
}

impl AppConfig {
    /// Validates every section.
    ///
    /// Returns the first failure, with the offending section named in the
    /// error context.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_run()?;
        self.validate_sweep()
    }

    /// Checks what the `run` command reads: `[lattice]` and `[run]`.
    pub fn validate_run(&self) -> anyhow::Result<()> {
        validate_config(&self.lattice).context("invalid [lattice] section")?;
        anyhow::ensure!(!self.run.stop_time.is_nan(), "Run stop time must be a number");
        anyhow::ensure!(
            self.run.max_steps != Some(0),
            "Run max_steps must be positive when set"
        );
        Ok(())
    }

    /// Checks the `[sweep]` section alone.
    pub fn validate_sweep(&self) -> anyhow::Result<()> {
        validate_sweep(&self.sweep).context("invalid [sweep] section")?;
        anyhow::ensure!(
            self.sweep.max_steps != Some(0),
            "Sweep max_steps must be positive when set"
        );
        Ok(())
    }

    /// Parses a TOML document. Sections are validated by the command that
    /// uses them.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str::<Self>(content)?)
    }

    /// Reads `path`, falling back to defaults when the file does not exist.
    ///
    /// A file that exists but fails to parse is an error.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content)
                .with_context(|| format!("failed to load {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Stable hash of every setting that influences results.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.lattice).as_bytes());
        hasher.update(format!("{:?}", self.run).as_bytes());
        hasher.update(format!("{:?}", self.sweep).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lattice.size, 100);
        assert_eq!(config.sweep.resolution, 3);
    }

    #[test]
    fn test_invalid_update_rule() {
        let config = AppConfig {
            lattice: LatticeConfig {
                update_rule: 8,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("[lattice]"));
    }

    #[test]
    fn test_even_sweep_resolution() {
        let config = AppConfig {
            sweep: SweepConfig {
                resolution: 2,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_max_steps() {
        let config = AppConfig {
            run: RunConfig {
                max_steps: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_partial_sections() {
        let config = AppConfig::from_toml(
            r#"
            [lattice]
            size = 20
            strategy_count = 2
            initial_proportions = [1.0, 3.0]
            payoff_matrix = [[1.0, 0.0], [2.0, 1.0]]

            [run]
            seed = 9
            "#,
        )
        .unwrap();
        assert_eq!(config.lattice.size, 20);
        assert_eq!(config.lattice.dimensions, 2);
        assert_eq!(config.run.seed, Some(9));
        assert_eq!(config.run.stop_time, 100.0);
        assert_eq!(config.sweep, SweepConfig::default());
    }

    #[test]
    fn test_bad_matrix_fails_run_section_only() {
        let config = AppConfig::from_toml(
            r#"
            [lattice]
            strategy_count = 2
            initial_proportions = [1.0, 1.0]
            payoff_matrix = [[1.0, 0.0, 1.0], [2.0, 1.0, 1.0]]
            "#,
        )
        .unwrap();
        let err = config.validate_run().unwrap_err();
        assert!(err.to_string().contains("[lattice]"));
        assert!(config.validate_sweep().is_ok());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_sweep_fails_sweep_section_only() {
        let config = AppConfig {
            sweep: SweepConfig {
                max_steps: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate_run().is_ok());
        assert!(config.validate_sweep().is_err());
    }

    #[test]
    fn test_from_toml_rejects_malformed_document() {
        assert!(AppConfig::from_toml("[lattice]\nsize = \"big\"\n").is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AppConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(AppConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_negative_stop_time_is_unbounded() {
        let run = RunConfig {
            stop_time: -1.0,
            ..Default::default()
        };
        assert_eq!(run.stop_condition().stop_time, None);
        assert_eq!(RunConfig::default().stop_condition().stop_time, Some(100.0));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("evolattice-missing-config.toml");
        let config = AppConfig::load_or_default(&path).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_fingerprint_consistency() {
        let config1 = AppConfig::default();
        let config2 = AppConfig::default();
        assert_eq!(config1.fingerprint(), config2.fingerprint());

        let mut changed = AppConfig::default();
        changed.sweep.a12 = 2.5;
        assert_ne!(config1.fingerprint(), changed.fingerprint());
    }
}
