/// Asserts that the maintained counts agree with a recount of the grid and
/// cover every site.
#[macro_export]
macro_rules! assert_counts_consistent {
    ($sim:expr) => {
        let lattice = $sim.lattice();
        assert!(
            lattice.check_consistency().is_ok(),
            "Counts {:?} disagree with the grid",
            lattice.counts()
        );
        assert_eq!(
            lattice.counts().iter().sum::<usize>(),
            lattice.site_count(),
            "Counts do not cover every site"
        );
    };
}

/// Asserts that the share of `strategy` is within `tol` of `expected`.
#[macro_export]
macro_rules! assert_proportion_near {
    ($sim:expr, $strategy:expr, $expected:expr, $tol:expr) => {
        let actual = $sim.proportion($strategy);
        assert!(
            (actual - $expected).abs() <= $tol,
            "Proportion of strategy {} was {}, expected {} +/- {}",
            $strategy,
            actual,
            $expected,
            $tol
        );
    };
}

/// Asserts that every cell of a phase diagram is a proportion.
#[macro_export]
macro_rules! assert_phase_diagram {
    ($result:expr, $resolution:expr) => {
        assert_eq!($result.proportions.len(), $resolution, "Row count mismatch");
        for row in &$result.proportions {
            assert_eq!(row.len(), $resolution, "Column count mismatch");
            for p in row {
                assert!((0.0..=1.0).contains(p), "Cell value {} outside [0, 1]", p);
            }
        }
    };
}
