//! Cross-field checks run before any lattice is built or rebuilt.
//!
//! Validation turns a raw [`LatticeConfig`] into a [`ValidatedConfig`]; the
//! rest of the engine only ever accepts the validated form.

use crate::error::ConfigError;
use crate::payoff::PayoffMatrix;
use crate::topology::Topology;
use evolattice_data::{Dimensions, GridSnapshot, LatticeConfig, Strategy, SweepConfig, UpdateRule};

/// Smallest lattice side for which every neighbour of a site is distinct
/// from the site itself.
pub const MIN_SIZE: usize = 3;

/// Upper bound on the number of sites in one lattice.
pub const MAX_SITES: usize = 1 << 28;

/// Largest accepted `size` for the given dimensionality.
#[must_use]
pub fn max_size(dimensions: Dimensions) -> usize {
    match dimensions {
        Dimensions::One => MAX_SITES,
        Dimensions::Two => MAX_SITES.isqrt(),
    }
}

/// A configuration that passed [`validate_config`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    raw: LatticeConfig,
    topology: Topology,
    dimensions: Dimensions,
    update_rule: UpdateRule,
    payoff: PayoffMatrix,
}

impl ValidatedConfig {
    #[must_use]
    pub fn raw(&self) -> &LatticeConfig {
        &self.raw
    }

    #[must_use]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    #[must_use]
    pub fn strategy_count(&self) -> usize {
        self.raw.strategy_count
    }

    #[must_use]
    pub fn update_rule(&self) -> UpdateRule {
        self.update_rule
    }

    #[must_use]
    pub fn payoff(&self) -> &PayoffMatrix {
        &self.payoff
    }

    #[must_use]
    pub fn initial_proportions(&self) -> &[f64] {
        &self.raw.initial_proportions
    }
}

/// Checks every field of `config` and their consistency.
///
/// The first violation found is returned; nothing is corrected silently.
pub fn validate_config(config: &LatticeConfig) -> Result<ValidatedConfig, ConfigError> {
    let matrix = &config.payoff_matrix;
    if matrix.is_empty() || matrix.iter().any(|row| row.len() != matrix.len()) {
        return Err(ConfigError::PayoffMatrixNotSquare);
    }

    let dimensions = Dimensions::from_raw(config.dimensions)
        .ok_or(ConfigError::InvalidDimensions(config.dimensions))?;

    if !(2..=3).contains(&config.strategy_count) {
        return Err(ConfigError::InvalidStrategyCount(config.strategy_count));
    }

    let update_rule = UpdateRule::from_index(config.update_rule)
        .ok_or(ConfigError::InvalidUpdateRule(config.update_rule))?;

    let topology = validate_geometry(config, dimensions)?;

    validate_proportions(&config.initial_proportions, config.strategy_count)?;

    if matrix.len() != config.strategy_count {
        return Err(ConfigError::PayoffMatrixShape {
            side: matrix.len(),
            strategy_count: config.strategy_count,
        });
    }

    for (row, values) in matrix.iter().enumerate() {
        for (col, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(ConfigError::NonFinitePayoff { row, col });
            }
            if update_rule.requires_non_negative_payoffs() && value < 0.0 {
                return Err(ConfigError::NegativePayoff {
                    rule: update_rule,
                    row,
                    col,
                    value,
                });
            }
        }
    }

    let payoff = PayoffMatrix::from_rows(matrix);
    if payoff.max_abs() == 0.0 {
        return Err(ConfigError::ZeroPayoffMatrix);
    }
    check_pool_mass(update_rule, matrix)?;

    Ok(ValidatedConfig {
        raw: config.clone(),
        topology,
        dimensions,
        update_rule,
        payoff,
    })
}

/// Rules 2 and 3 draw from pooled neighbour payoffs, which must never all
/// be zero.
///
/// A site of strategy `row` whose neighbours all play `col` earns nothing
/// when `[row][col]` is zero. Under rule 2 a focal `col` ringed by such
/// sites therefore has an empty pool. Rule 3 adds the focal payoff, so
/// `[col][row]` must vanish as well.
fn check_pool_mass(rule: UpdateRule, matrix: &[Vec<f64>]) -> Result<(), ConfigError> {
    let zero = |row: usize, col: usize| matrix[row][col] == 0.0;
    for row in 0..matrix.len() {
        for col in 0..matrix.len() {
            let reachable = match rule {
                UpdateRule::DeathBirth => zero(row, col),
                UpdateRule::Imitation => zero(row, col) && zero(col, row),
                _ => false,
            };
            if reachable {
                return Err(ConfigError::ZeroPoolReachable { rule, row, col });
            }
        }
    }
    Ok(())
}

fn check_size(size: usize, dimensions: Dimensions) -> Result<(), ConfigError> {
    let max = max_size(dimensions);
    if !(MIN_SIZE..=max).contains(&size) {
        return Err(ConfigError::InvalidSize {
            size,
            min: MIN_SIZE,
            max,
        });
    }
    Ok(())
}

fn validate_geometry(config: &LatticeConfig, dimensions: Dimensions) -> Result<Topology, ConfigError> {
    check_size(config.size, dimensions)?;
    let bad_range = ConfigError::InvalidInteractionRange {
        range: config.interaction_range,
        dimensions: config.dimensions,
        size: config.size,
    };
    match dimensions {
        Dimensions::One => {
            // Both sides together must not wrap onto the site itself.
            if config.interaction_range == 0 || 2 * config.interaction_range >= config.size {
                return Err(bad_range);
            }
            Ok(Topology::Ring {
                size: config.size,
                range: config.interaction_range,
            })
        }
        Dimensions::Two => {
            if config.interaction_range > 1 {
                return Err(bad_range);
            }
            Ok(Topology::Torus { size: config.size })
        }
    }
}

fn validate_proportions(weights: &[f64], strategy_count: usize) -> Result<(), ConfigError> {
    if weights.len() != strategy_count {
        return Err(ConfigError::ProportionLength {
            len: weights.len(),
            strategy_count,
        });
    }
    if let Some(strategy) = weights.iter().position(|w| !w.is_finite() || *w < 0.0) {
        return Err(ConfigError::NegativeProportion { strategy });
    }
    if weights.iter().sum::<f64>() <= 0.0 {
        return Err(ConfigError::ZeroProportions);
    }
    Ok(())
}

/// Checks that an existing grid fits a validated configuration.
pub fn validate_grid(config: &ValidatedConfig, grid: &GridSnapshot) -> Result<(), ConfigError> {
    if grid.dimensions != config.dimensions() {
        return Err(ConfigError::GridDimensions {
            expected: config.dimensions().as_raw(),
            actual: grid.dimensions.as_raw(),
        });
    }
    if usize::from(grid.strategy_count) != config.strategy_count() {
        return Err(ConfigError::GridStrategyCount {
            expected: config.strategy_count(),
            actual: usize::from(grid.strategy_count),
        });
    }
    let expected = config.topology().site_count();
    if grid.size as usize != config.topology().size() || grid.cells.len() != expected {
        return Err(ConfigError::GridShape {
            expected,
            actual: grid.cells.len(),
        });
    }
    validate_labels(&grid.cells, config.strategy_count())
}

/// Every cell must hold a label in `0..strategy_count`.
pub fn validate_labels(cells: &[Strategy], strategy_count: usize) -> Result<(), ConfigError> {
    match cells
        .iter()
        .enumerate()
        .find(|&(_, &s)| usize::from(s) >= strategy_count)
    {
        Some((site, &strategy)) => Err(ConfigError::GridLabel {
            site,
            strategy,
            strategy_count,
        }),
        None => Ok(()),
    }
}

/// The occupancy vector must match a fresh recount of the grid.
pub fn validate_counts(
    cells: &[Strategy],
    counts: &[usize],
    strategy_count: usize,
) -> Result<(), ConfigError> {
    validate_labels(cells, strategy_count)?;
    let mut recount = vec![0usize; strategy_count];
    for &cell in cells {
        recount[usize::from(cell)] += 1;
    }
    if recount != counts {
        return Err(ConfigError::CountMismatch {
            counts: counts.to_vec(),
        });
    }
    Ok(())
}

/// Checks the scalar sweep parameters and returns the selected rule.
///
/// Per-cell payoff matrices are checked separately once the ranges exist.
pub fn validate_sweep(config: &SweepConfig) -> Result<UpdateRule, ConfigError> {
    if config.resolution == 0 {
        return Err(ConfigError::ZeroResolution);
    }
    if config.resolution % 2 == 0 {
        return Err(ConfigError::EvenResolution(config.resolution));
    }
    if !config.half_width.is_finite() || config.half_width < 0.0 {
        return Err(ConfigError::InvalidHalfWidth(config.half_width));
    }
    if !config.stop_time.is_finite() || config.stop_time < 0.0 {
        return Err(ConfigError::InvalidStopTime(config.stop_time));
    }
    check_size(config.lattice_size, Dimensions::Two)?;
    UpdateRule::from_index(config.update_rule).ok_or(ConfigError::InvalidUpdateRule(config.update_rule))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> LatticeConfig {
        LatticeConfig::two_strategy(10, [[1.0, 2.0], [3.0, 4.0]], 0)
    }

    #[test]
    fn test_default_config_validates() {
        let validated = validate_config(&LatticeConfig::default()).unwrap();
        assert_eq!(validated.strategy_count(), 3);
        assert_eq!(validated.topology(), Topology::Torus { size: 100 });
        assert_eq!(validated.update_rule(), UpdateRule::PayoffBirthDeath);
    }

    #[test]
    fn test_invalid_dimensions() {
        let config = LatticeConfig {
            dimensions: 3,
            ..base()
        };
        assert_eq!(validate_config(&config), Err(ConfigError::InvalidDimensions(3)));
    }

    #[test]
    fn test_invalid_strategy_count() {
        let config = LatticeConfig {
            strategy_count: 4,
            ..base()
        };
        assert_eq!(validate_config(&config), Err(ConfigError::InvalidStrategyCount(4)));
    }

    #[test]
    fn test_invalid_update_rule() {
        let config = LatticeConfig {
            update_rule: 8,
            ..base()
        };
        assert_eq!(validate_config(&config), Err(ConfigError::InvalidUpdateRule(8)));
    }

    #[test]
    fn test_ragged_matrix_rejected() {
        let config = LatticeConfig {
            payoff_matrix: vec![vec![1.0, 2.0], vec![3.0]],
            ..base()
        };
        assert_eq!(validate_config(&config), Err(ConfigError::PayoffMatrixNotSquare));
    }

    #[test]
    fn test_matrix_side_must_match_strategies() {
        let config = LatticeConfig {
            payoff_matrix: vec![vec![1.0; 3]; 3],
            ..base()
        };
        assert_eq!(
            validate_config(&config),
            Err(ConfigError::PayoffMatrixShape {
                side: 3,
                strategy_count: 2
            })
        );
    }

    #[test]
    fn test_proportion_checks() {
        let short = LatticeConfig {
            initial_proportions: vec![1.0],
            ..base()
        };
        assert!(matches!(
            validate_config(&short),
            Err(ConfigError::ProportionLength { len: 1, .. })
        ));

        let negative = LatticeConfig {
            initial_proportions: vec![1.0, -1.0],
            ..base()
        };
        assert_eq!(
            validate_config(&negative),
            Err(ConfigError::NegativeProportion { strategy: 1 })
        );

        let zero = LatticeConfig {
            initial_proportions: vec![0.0, 0.0],
            ..base()
        };
        assert_eq!(validate_config(&zero), Err(ConfigError::ZeroProportions));
    }

    #[test]
    fn test_negative_payoff_rejected_for_birth_rate_rules() {
        for rule in [1u8, 2, 3] {
            let config = LatticeConfig::two_strategy(10, [[1.0, -1.0], [1.0, 1.0]], rule);
            assert!(matches!(
                validate_config(&config),
                Err(ConfigError::NegativePayoff { row: 0, col: 1, .. })
            ));
        }
        for rule in [0u8, 4, 5, 6, 7] {
            let config = LatticeConfig::two_strategy(10, [[1.0, -1.0], [1.0, 1.0]], rule);
            assert!(validate_config(&config).is_ok(), "rule {rule} should accept");
        }
    }

    #[test]
    fn test_zero_pool_configs_rejected_for_death_birth() {
        // A strategy-0 block earns nothing against itself.
        let config = LatticeConfig::two_strategy(10, [[0.0, 5.0], [5.0, 0.0]], 2);
        assert_eq!(
            validate_config(&config),
            Err(ConfigError::ZeroPoolReachable {
                rule: UpdateRule::DeathBirth,
                row: 0,
                col: 0
            })
        );

        // Strategy 1 ringed by strategy 0 earns nothing, so a strategy-0
        // focal surrounded by such sites has an empty pool.
        let config = LatticeConfig::two_strategy(10, [[1.0, 1.0], [0.0, 1.0]], 2);
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ZeroPoolReachable { row: 1, col: 0, .. })
        ));
    }

    #[test]
    fn test_zero_pool_configs_for_imitation() {
        // The focal payoff rescues a one-sided zero.
        let one_sided = LatticeConfig::two_strategy(10, [[1.0, 1.0], [0.0, 1.0]], 3);
        assert!(validate_config(&one_sided).is_ok());

        // A checkerboard zeroes every payoff.
        let checkerboard = LatticeConfig::two_strategy(10, [[1.0, 0.0], [0.0, 1.0]], 3);
        assert!(matches!(
            validate_config(&checkerboard),
            Err(ConfigError::ZeroPoolReachable { row: 0, col: 1, .. })
        ));

        let diagonal = LatticeConfig::two_strategy(10, [[2.0, 1.0], [1.0, 0.0]], 3);
        assert!(matches!(
            validate_config(&diagonal),
            Err(ConfigError::ZeroPoolReachable { row: 1, col: 1, .. })
        ));
    }

    #[test]
    fn test_zero_entries_allowed_for_other_rules() {
        for rule in [0u8, 1, 4, 5, 6, 7] {
            let config = LatticeConfig::two_strategy(10, [[0.0, 5.0], [5.0, 0.0]], rule);
            assert!(validate_config(&config).is_ok(), "rule {rule} should accept");
        }
    }

    #[test]
    fn test_zero_matrix_rejected() {
        let config = LatticeConfig::two_strategy(10, [[0.0, 0.0], [0.0, 0.0]], 0);
        assert_eq!(validate_config(&config), Err(ConfigError::ZeroPayoffMatrix));
    }

    #[test]
    fn test_non_finite_payoff_rejected() {
        let config = LatticeConfig::two_strategy(10, [[1.0, f64::INFINITY], [1.0, 1.0]], 0);
        assert_eq!(
            validate_config(&config),
            Err(ConfigError::NonFinitePayoff { row: 0, col: 1 })
        );
    }

    #[test]
    fn test_geometry_checks() {
        let tiny = LatticeConfig { size: 2, ..base() };
        assert!(matches!(validate_config(&tiny), Err(ConfigError::InvalidSize { .. })));

        // The site count of a huge torus would overflow.
        let huge = LatticeConfig { size: 1 << 32, ..base() };
        assert_eq!(
            validate_config(&huge),
            Err(ConfigError::InvalidSize {
                size: 1 << 32,
                min: MIN_SIZE,
                max: 1 << 14
            })
        );
        let largest = LatticeConfig { size: 1 << 14, ..base() };
        assert_eq!(largest.site_count(), MAX_SITES);
        assert!(matches!(
            validate_config(&LatticeConfig { size: (1 << 14) + 1, ..base() }),
            Err(ConfigError::InvalidSize { .. })
        ));

        let long_ring = LatticeConfig {
            dimensions: 1,
            size: MAX_SITES + 1,
            ..base()
        };
        assert!(matches!(
            validate_config(&long_ring),
            Err(ConfigError::InvalidSize { max: MAX_SITES, .. })
        ));

        let wide_2d = LatticeConfig {
            interaction_range: 2,
            ..base()
        };
        assert!(matches!(
            validate_config(&wide_2d),
            Err(ConfigError::InvalidInteractionRange { .. })
        ));

        let ring = LatticeConfig {
            dimensions: 1,
            interaction_range: 5,
            ..base()
        };
        assert!(matches!(
            validate_config(&ring),
            Err(ConfigError::InvalidInteractionRange { range: 5, .. })
        ));

        let ring = LatticeConfig {
            dimensions: 1,
            interaction_range: 4,
            ..base()
        };
        assert_eq!(
            validate_config(&ring).unwrap().topology(),
            Topology::Ring { size: 10, range: 4 }
        );
    }

    #[test]
    fn test_grid_checks() {
        let config = validate_config(&LatticeConfig::two_strategy(3, [[1.0, 1.0], [1.0, 1.0]], 0))
            .unwrap();
        let mut grid = GridSnapshot {
            dimensions: Dimensions::Two,
            size: 3,
            strategy_count: 2,
            steps: 0,
            cells: vec![0; 9],
        };
        assert!(validate_grid(&config, &grid).is_ok());

        grid.strategy_count = 3;
        assert_eq!(
            validate_grid(&config, &grid),
            Err(ConfigError::GridStrategyCount {
                expected: 2,
                actual: 3
            })
        );
        grid.strategy_count = 2;

        grid.cells[4] = 2;
        assert!(matches!(
            validate_grid(&config, &grid),
            Err(ConfigError::GridLabel { site: 4, strategy: 2, .. })
        ));

        grid.cells.truncate(8);
        assert!(matches!(
            validate_grid(&config, &grid),
            Err(ConfigError::GridShape { expected: 9, actual: 8 })
        ));

        grid.dimensions = Dimensions::One;
        assert!(matches!(
            validate_grid(&config, &grid),
            Err(ConfigError::GridDimensions { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_count_consistency() {
        let cells = [0, 1, 1, 0, 1];
        assert!(validate_counts(&cells, &[2, 3], 2).is_ok());
        assert!(matches!(
            validate_counts(&cells, &[3, 2], 2),
            Err(ConfigError::CountMismatch { .. })
        ));
    }

    #[test]
    fn test_sweep_checks() {
        let ok = SweepConfig::default();
        assert_eq!(validate_sweep(&ok), Ok(UpdateRule::PayoffBirthDeath));

        let even = SweepConfig {
            resolution: 4,
            ..SweepConfig::default()
        };
        assert_eq!(validate_sweep(&even), Err(ConfigError::EvenResolution(4)));

        let zero = SweepConfig {
            resolution: 0,
            ..SweepConfig::default()
        };
        assert_eq!(validate_sweep(&zero), Err(ConfigError::ZeroResolution));

        let stop = SweepConfig {
            stop_time: -1.0,
            ..SweepConfig::default()
        };
        assert!(matches!(validate_sweep(&stop), Err(ConfigError::InvalidStopTime(_))));

        let huge = SweepConfig {
            lattice_size: usize::MAX,
            ..SweepConfig::default()
        };
        assert!(matches!(validate_sweep(&huge), Err(ConfigError::InvalidSize { .. })));
    }
}
