use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Probability;
use crate::error::{OracleError, Result};

/// Value a "likely" thumbs vote counts as.
pub const THUMBS_UP_VALUE: u8 = 75;
/// Value an "unlikely" thumbs vote counts as.
pub const THUMBS_DOWN_VALUE: u8 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Probability,
    Thumbs,
}

impl std::fmt::Display for VoteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoteKind::Probability => write!(f, "probability"),
            VoteKind::Thumbs => write!(f, "thumbs"),
        }
    }
}

/// A single crowd vote. Immutable once created: a changed vote is a new `Vote`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawVote")]
pub struct Vote {
    id: Uuid,
    #[serde(rename = "type")]
    kind: VoteKind,
    value: Probability,
    timestamp: DateTime<Utc>,
}

/// Unchecked stored form
#[derive(Deserialize)]
struct RawVote {
    id: Uuid,
    #[serde(rename = "type")]
    kind: VoteKind,
    value: Probability,
    timestamp: DateTime<Utc>,
}

impl TryFrom<RawVote> for Vote {
    type Error = OracleError;

    fn try_from(raw: RawVote) -> Result<Self> {
        let percent = raw.value.percent();
        if raw.kind == VoteKind::Thumbs && percent != THUMBS_UP_VALUE && percent != THUMBS_DOWN_VALUE {
            return Err(OracleError::Store(format!(
                "Thumbs vote {} has value {}, expected {} or {}",
                raw.id, percent, THUMBS_UP_VALUE, THUMBS_DOWN_VALUE
            )));
        }
        Ok(Self {
            id: raw.id,
            kind: raw.kind,
            value: raw.value,
            timestamp: raw.timestamp,
        })
    }
}

impl Vote {
    /// Explicit probability estimate, rejected outside 0..=100.
    pub fn probability(value: i64) -> Result<Self> {
        Ok(Self::with_kind(VoteKind::Probability, Probability::new(value)?))
    }

    /// Quick vote, mapped to a fixed value before it reaches any aggregate.
    pub fn thumbs(likely: bool) -> Self {
        let value = if likely { THUMBS_UP_VALUE } else { THUMBS_DOWN_VALUE };
        Self::with_kind(VoteKind::Thumbs, Probability(value))
    }

    fn with_kind(kind: VoteKind, value: Probability) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            value,
            timestamp: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> VoteKind {
        self.kind
    }

    pub fn value(&self) -> Probability {
        self.value
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
