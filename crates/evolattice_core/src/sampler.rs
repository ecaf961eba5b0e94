//! Categorical draws from unnormalised weights.
//!
//! A uniform value `u` in `(0, 1]` selects the smallest index whose
//! normalised cumulative weight is `>= u`. Ties at interval boundaries
//! therefore resolve to the lower index.

use rand::Rng;

/// Normalised cumulative distribution over `0..len`.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeWeights {
    cumulative: Vec<f64>,
    /// Highest index with positive weight; absorbs rounding at the top end.
    last_positive: usize,
}

impl CumulativeWeights {
    /// Builds the distribution, or `None` if the weights are empty, contain a
    /// negative or non-finite entry, or sum to zero.
    #[must_use]
    pub fn new(weights: &[f64]) -> Option<Self> {
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return None;
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return None;
        }
        let last_positive = weights.iter().rposition(|&w| w > 0.0)?;
        let mut running = 0.0;
        let cumulative = weights
            .iter()
            .map(|w| {
                running += w;
                running / total
            })
            .collect();
        Some(Self {
            cumulative,
            last_positive,
        })
    }

    /// Index selected by `u`, expected in `(0, 1]`.
    #[must_use]
    pub fn sample(&self, u: f64) -> usize {
        self.cumulative
            .iter()
            .position(|&c| u <= c)
            .unwrap_or(self.last_positive)
    }

    /// Draws an index using `rng`.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.sample(unit_open_closed(rng))
    }
}

/// Uniform value in `(0, 1]`.
#[inline]
pub fn unit_open_closed<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    1.0 - rng.gen::<f64>()
}
