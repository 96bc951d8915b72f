use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Outcome, Probability};
use crate::error::{OracleError, Result};
use crate::scoring;

/// Which forecaster a prediction came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    Model,
    Community,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Source::Model => "Model",
            Source::Community => "Community",
        })
    }
}

/// What happened on a resolved day. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDetails {
    #[serde(default, rename = "eventName", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Inches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snowfall: Option<f64>,
    /// Degrees Fahrenheit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl EventDetails {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(value) = self.snowfall {
            if !value.is_finite() || value < 0.0 {
                return Err(OracleError::InvalidMeasurement { field: "snowfall", value });
            }
        }
        if let Some(value) = self.temperature {
            if !value.is_finite() {
                return Err(OracleError::InvalidMeasurement { field: "temperature", value });
            }
        }
        Ok(())
    }
}

/// One resolved day: both predictions, the outcome and their Brier scores.
///
/// Built through [`AccuracyRecord::resolve`], so the stored scores always
/// agree with the predictions. Deserialization re-checks every range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawRecord")]
pub struct AccuracyRecord {
    date: NaiveDate,
    model_prediction: Probability,
    community_prediction: Probability,
    actual_outcome: Outcome,
    model_brier_score: f64,
    community_brier_score: f64,
    #[serde(default, skip_serializing_if = "EventDetails::is_empty")]
    event: EventDetails,
}

/// Unchecked stored form
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    date: NaiveDate,
    model_prediction: Probability,
    community_prediction: Probability,
    actual_outcome: Outcome,
    model_brier_score: f64,
    community_brier_score: f64,
    #[serde(default)]
    event: EventDetails,
}

impl TryFrom<RawRecord> for AccuracyRecord {
    type Error = OracleError;

    fn try_from(raw: RawRecord) -> Result<Self> {
        for score in [raw.model_brier_score, raw.community_brier_score] {
            if !(0.0..=1.0).contains(&score) {
                return Err(OracleError::Store(format!(
                    "Brier score {} for {} is outside 0..=1",
                    score, raw.date
                )));
            }
        }
        raw.event.validate()?;
        Ok(Self {
            date: raw.date,
            model_prediction: raw.model_prediction,
            community_prediction: raw.community_prediction,
            actual_outcome: raw.actual_outcome,
            model_brier_score: raw.model_brier_score,
            community_brier_score: raw.community_brier_score,
            event: raw.event,
        })
    }
}

impl AccuracyRecord {
    pub fn resolve(
        date: NaiveDate,
        model_prediction: Probability,
        community_prediction: Probability,
        actual_outcome: Outcome,
    ) -> Self {
        Self {
            date,
            model_prediction,
            community_prediction,
            actual_outcome,
            model_brier_score: scoring::score(model_prediction, actual_outcome),
            community_brier_score: scoring::score(community_prediction, actual_outcome),
            event: EventDetails::default(),
        }
    }

    /// Attach what happened that day.
    pub fn with_event(mut self, event: EventDetails) -> Result<Self> {
        event.validate()?;
        self.event = event;
        Ok(self)
    }

    pub fn event(&self) -> &EventDetails {
        &self.event
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn prediction(&self, source: Source) -> Probability {
        match source {
            Source::Model => self.model_prediction,
            Source::Community => self.community_prediction,
        }
    }

    pub fn brier_score(&self, source: Source) -> f64 {
        match source {
            Source::Model => self.model_brier_score,
            Source::Community => self.community_brier_score,
        }
    }

    pub fn model_prediction(&self) -> Probability {
        self.model_prediction
    }

    pub fn community_prediction(&self) -> Probability {
        self.community_prediction
    }

    pub fn actual_outcome(&self) -> Outcome {
        self.actual_outcome
    }
}
