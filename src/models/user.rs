use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{OracleError, Result};

/// Leaderboard summary for one forecaster.
///
/// Maintained outside the core; the library ranks and validates these but
/// never recomputes them from votes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStat {
    pub username: String,
    pub brier_score: f64,
    pub total_votes: u32,
    #[serde(alias = "accuracy")]
    pub accuracy_percent: u8,
    pub streak: u32,
    #[serde(default)]
    pub badges: BTreeSet<String>,
}

impl UserStat {
    /// Check the ranges a leaderboard entry must respect.
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(OracleError::Store("Leaderboard entry has an empty username".into()));
        }
        if !(0.0..=1.0).contains(&self.brier_score) {
            return Err(OracleError::Store(format!(
                "{}: Brier score {} is outside 0..=1",
                self.username, self.brier_score
            )));
        }
        if self.accuracy_percent > 100 {
            return Err(OracleError::InvalidProbability(f64::from(self.accuracy_percent)));
        }
        Ok(())
    }
}
