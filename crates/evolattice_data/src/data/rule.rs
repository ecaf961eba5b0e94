use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The eight stochastic update rules.
///
/// The discriminant is the numeric selector used in configuration files and
/// on the command line (`0..=7`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Archive,
    RkyvSerialize,
    RkyvDeserialize,
)]
#[archive(check_bytes)]
#[serde(rename_all = "snake_case")]
pub enum UpdateRule {
    /// Negative payoff is a death rate, positive payoff a birth rate.
    #[default]
    PayoffBirthDeath,
    /// Payoff is a birth rate; a random neighbour is replaced by the focal strategy.
    LinearBirthDeath,
    /// Focal site dies and is replaced proportionally to neighbour payoff pools.
    DeathBirth,
    /// Death-birth with the focal site's own payoff in the pool.
    Imitation,
    /// The least fit neighbour is replaced by the focal strategy.
    BirthDeathLeastFit,
    /// Focal site copies its fittest neighbour.
    DeathBirthFittest,
    /// Focal site copies the fittest of its neighbours and itself.
    ImitationFittest,
    /// Focal site switches to whichever strategy maximises its own payoff.
    BestResponse,
}

impl UpdateRule {
    pub const ALL: [UpdateRule; 8] = [
        UpdateRule::PayoffBirthDeath,
        UpdateRule::LinearBirthDeath,
        UpdateRule::DeathBirth,
        UpdateRule::Imitation,
        UpdateRule::BirthDeathLeastFit,
        UpdateRule::DeathBirthFittest,
        UpdateRule::ImitationFittest,
        UpdateRule::BestResponse,
    ];

    /// Maps a numeric selector onto a rule, `None` outside `0..=7`.
    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    #[must_use]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Rules that read payoffs as unnormalised birth rates and therefore
    /// cannot accept negative payoff coefficients.
    #[must_use]
    pub fn requires_non_negative_payoffs(self) -> bool {
        matches!(
            self,
            UpdateRule::LinearBirthDeath | UpdateRule::DeathBirth | UpdateRule::Imitation
        )
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            UpdateRule::PayoffBirthDeath => "payoff birth/death",
            UpdateRule::LinearBirthDeath => "linear birth-death",
            UpdateRule::DeathBirth => "death-birth",
            UpdateRule::Imitation => "imitation",
            UpdateRule::BirthDeathLeastFit => "birth-death of least fit",
            UpdateRule::DeathBirthFittest => "death-birth of fittest",
            UpdateRule::ImitationFittest => "imitation of fittest",
            UpdateRule::BestResponse => "best response",
        }
    }
}

impl fmt::Display for UpdateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.index(), self.name())
    }
}

/// Lattice dimensionality: a ring or a square torus.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Archive,
    RkyvSerialize,
    RkyvDeserialize,
)]
#[archive(check_bytes)]
pub enum Dimensions {
    One,
    Two,
}

impl Dimensions {
    #[must_use]
    pub fn from_raw(dimensions: u8) -> Option<Self> {
        match dimensions {
            1 => Some(Dimensions::One),
            2 => Some(Dimensions::Two),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_raw(self) -> u8 {
        match self {
            Dimensions::One => 1,
            Dimensions::Two => 2,
        }
    }
}
