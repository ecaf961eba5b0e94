//! Square payoff matrix stored row-major.

use evolattice_data::Strategy;

#[derive(Debug, Clone, PartialEq)]
pub struct PayoffMatrix {
    side: usize,
    entries: Vec<f64>,
}

impl PayoffMatrix {
    /// Flattens `rows`. Callers are expected to have checked squareness.
    #[must_use]
    pub(crate) fn from_rows(rows: &[Vec<f64>]) -> Self {
        Self {
            side: rows.len(),
            entries: rows.iter().flatten().copied().collect(),
        }
    }

    #[must_use]
    pub fn side(&self) -> usize {
        self.side
    }

    /// What `row` earns against `col`.
    #[inline]
    #[must_use]
    pub fn get(&self, row: Strategy, col: Strategy) -> f64 {
        self.entries[usize::from(row) * self.side + usize::from(col)]
    }

    /// Largest absolute coefficient.
    #[must_use]
    pub fn max_abs(&self) -> f64 {
        self.entries.iter().fold(0.0, |acc: f64, v| acc.max(v.abs()))
    }

    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.entries
            .chunks(self.side.max(1))
            .map(<[f64]>::to_vec)
            .collect()
    }
}
