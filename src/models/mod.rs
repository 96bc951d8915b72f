pub mod record;
pub mod user;
pub mod vote;

use serde::{Deserialize, Serialize};

use crate::error::{OracleError, Result};

pub use record::{AccuracyRecord, EventDetails, Source};
pub use user::UserStat;
pub use vote::{Vote, VoteKind};

/// A percentage probability, always within 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Probability(u8);

impl Probability {
    pub const MAX: Probability = Probability(100);

    pub fn new(value: i64) -> Result<Self> {
        if (0..=100).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(OracleError::InvalidProbability(value as f64))
        }
    }

    /// Round a fractional percentage from an external source. NaN, infinities
    /// and anything outside 0.0..=100.0 are rejected before rounding.
    pub fn from_percent(value: f64) -> Result<Self> {
        if value.is_finite() && (0.0..=100.0).contains(&value) {
            Ok(Self(value.round() as u8))
        } else {
            Err(OracleError::InvalidProbability(value))
        }
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    /// Probability as a fraction in 0.0..=1.0
    pub fn fraction(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// Whether this probability calls for the event to happen (strictly above 50).
    pub fn predicts_event(self) -> bool {
        self.0 > 50
    }
}

impl TryFrom<i64> for Probability {
    type Error = OracleError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Probability> for u8 {
    fn from(p: Probability) -> u8 {
        p.0
    }
}

impl std::fmt::Display for Probability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&format!("{}%", self.0))
    }
}

/// Realized outcome of the event: 1 if it happened, 0 if not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub enum Outcome {
    NotOccurred,
    Occurred,
}

impl Outcome {
    pub fn new(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Outcome::NotOccurred),
            1 => Ok(Outcome::Occurred),
            other => Err(OracleError::InvalidOutcome(other)),
        }
    }

    pub fn occurred(self) -> bool {
        self == Outcome::Occurred
    }

    pub fn value(self) -> u8 {
        match self {
            Outcome::NotOccurred => 0,
            Outcome::Occurred => 1,
        }
    }
}

impl TryFrom<i64> for Outcome {
    type Error = OracleError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Outcome> for u8 {
    fn from(o: Outcome) -> u8 {
        o.value()
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Outcome::NotOccurred => "No",
            Outcome::Occurred => "Yes",
        })
    }
}
