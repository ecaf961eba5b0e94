//! A single simulation run: one lattice, one random source, one rule.

use crate::error::{ConfigError, LatticeError};
use crate::lattice::Lattice;
use crate::rules::{self, Mutation};
use crate::validation::{validate_config, ValidatedConfig};
use evolattice_data::{GridSnapshot, LatticeConfig, StopReason, Strategy, UpdateRule};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// When [`Simulation::run_until`] gives up.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StopCondition {
    /// Stop once simulated time exceeds this. `None` runs until absorption.
    pub stop_time: Option<f64>,
    /// Ceiling on elementary steps taken by this call.
    pub max_steps: Option<u64>,
}

impl StopCondition {
    #[must_use]
    pub fn at_time(stop_time: f64) -> Self {
        Self {
            stop_time: Some(stop_time),
            max_steps: None,
        }
    }

    #[must_use]
    pub fn with_max_steps(mut self, max_steps: Option<u64>) -> Self {
        self.max_steps = max_steps;
        self
    }
}

/// Summary of a finished [`Simulation::run_until`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Total elementary steps since creation or the last reconfiguration.
    pub steps: u64,
    pub time: f64,
    pub reason: StopReason,
    pub proportions: Vec<f64>,
}

/// Owns a lattice and the random source driving it.
///
/// Steps are strictly sequential; every draw comes from the one
/// `ChaCha8Rng` seeded at creation.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: ValidatedConfig,
    lattice: Lattice,
    rng: ChaCha8Rng,
    steps: u64,
}

impl Simulation {
    /// Validates `config` and builds a freshly populated lattice.
    ///
    /// With `seed == None` the random source is seeded from entropy.
    pub fn create(config: &LatticeConfig, seed: Option<u64>) -> Result<Self, ConfigError> {
        let config = validate_config(config)?;
        let mut rng = seeded_rng(seed);
        let lattice = Lattice::new(&config, &mut rng)?;
        tracing::debug!(
            rule = %config.update_rule(),
            sites = lattice.site_count(),
            max_rate = lattice.max_rate(),
            "Simulation created"
        );
        Ok(Self {
            config,
            lattice,
            rng,
            steps: 0,
        })
    }

    /// Rebuilds a run from a saved grid. The step counter resumes from the
    /// snapshot.
    pub fn restore(
        config: &LatticeConfig,
        grid: &GridSnapshot,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let config = validate_config(config)?;
        let lattice = Lattice::from_snapshot(&config, grid)?;
        lattice.check_consistency()?;
        Ok(Self {
            config,
            lattice,
            rng: seeded_rng(seed),
            steps: grid.steps,
        })
    }

    /// Validates `config` and, only if it passes, repopulates the lattice
    /// under it. Elapsed time starts again from zero.
    pub fn reconfigure(&mut self, config: &LatticeConfig) -> Result<(), ConfigError> {
        let config = validate_config(config)?;
        let lattice = Lattice::new(&config, &mut self.rng)?;
        self.config = config;
        self.lattice = lattice;
        self.steps = 0;
        Ok(())
    }

    /// One elementary update at a uniformly chosen focal site.
    pub fn step(&mut self) -> Result<Option<Mutation>, LatticeError> {
        let focal = self.lattice.topology().random_site(&mut self.rng);
        let mutation = rules::apply(self.config.update_rule(), &mut self.lattice, focal, &mut self.rng)?;
        self.steps += 1;
        Ok(mutation)
    }

    /// Steps until `stop` is met or `cancel` is raised.
    ///
    /// The flag is checked before every elementary step.
    pub fn run_until(
        &mut self,
        stop: &StopCondition,
        cancel: &AtomicBool,
    ) -> Result<RunOutcome, LatticeError> {
        let start = self.steps;
        let reason = loop {
            if cancel.load(Ordering::Relaxed) {
                break StopReason::Cancelled;
            }
            if self.lattice.is_absorbed() {
                tracing::debug!(steps = self.steps, "Lattice absorbed");
                break StopReason::Absorbed;
            }
            if stop.stop_time.is_some_and(|t| self.elapsed_time() > t) {
                break StopReason::StopTime;
            }
            if stop.max_steps.is_some_and(|m| self.steps - start >= m) {
                break StopReason::MaxSteps;
            }
            self.step()?;
            if self.steps.is_multiple_of(TRACE_EVERY) {
                tracing::trace!(
                    steps = self.steps,
                    time = self.elapsed_time(),
                    proportion = self.proportion(0),
                    "Simulation progress"
                );
            }
        };
        Ok(self.outcome(reason))
    }

    #[must_use]
    pub fn outcome(&self, reason: StopReason) -> RunOutcome {
        RunOutcome {
            steps: self.steps,
            time: self.elapsed_time(),
            reason,
            proportions: self.lattice.proportions(),
        }
    }

    #[must_use]
    pub fn proportion(&self, strategy: Strategy) -> f64 {
        self.lattice.proportion_of(strategy)
    }

    #[must_use]
    pub fn proportions(&self) -> Vec<f64> {
        self.lattice.proportions()
    }

    #[must_use]
    pub fn max_rate(&self) -> f64 {
        self.lattice.max_rate()
    }

    #[must_use]
    pub fn grid_snapshot(&self) -> GridSnapshot {
        self.lattice.snapshot(self.steps)
    }

    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Simulated time: steps divided by `max_rate * site_count`.
    #[must_use]
    pub fn elapsed_time(&self) -> f64 {
        self.steps as f64 / (self.lattice.max_rate() * self.lattice.site_count() as f64)
    }

    #[must_use]
    pub fn is_absorbed(&self) -> bool {
        self.lattice.is_absorbed()
    }

    #[must_use]
    pub fn update_rule(&self) -> UpdateRule {
        self.config.update_rule()
    }

    #[must_use]
    pub fn config(&self) -> &LatticeConfig {
        self.config.raw()
    }

    #[must_use]
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }
}

const TRACE_EVERY: u64 = 100_000;

fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}
