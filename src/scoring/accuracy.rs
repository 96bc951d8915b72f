use serde::Serialize;

use crate::models::{AccuracyRecord, Outcome, Probability, Source};

/// Correctness tier of a single prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccuracyTier {
    Excellent,
    Good,
    Lucky,
    Miss,
}

impl AccuracyTier {
    pub fn label(&self) -> &'static str {
        match self {
            AccuracyTier::Excellent => "Excellent",
            AccuracyTier::Good => "Good",
            AccuracyTier::Lucky => "Lucky",
            AccuracyTier::Miss => "Miss",
        }
    }
}

impl std::fmt::Display for AccuracyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// Whether the prediction called the right side of 50%.
fn direction_correct(prediction: Probability, outcome: Outcome) -> bool {
    prediction.predicts_event() == outcome.occurred()
}

/// Tier a prediction. Direction is checked before confidence, so a wrong
/// call is a `Miss` however close to 50 it was.
pub fn classify(prediction: Probability, outcome: Outcome) -> AccuracyTier {
    if !direction_correct(prediction, outcome) {
        return AccuracyTier::Miss;
    }

    let confidence = (i16::from(prediction.percent()) - 50).abs();
    if confidence > 30 {
        AccuracyTier::Excellent
    } else if confidence > 15 {
        AccuracyTier::Good
    } else {
        AccuracyTier::Lucky
    }
}

/// Percentage (0..=100, rounded) of records where `source` got the direction right.
///
/// Independent of the tiers above. Empty input yields 0.
pub fn accuracy_rate(records: &[AccuracyRecord], source: Source) -> u8 {
    if records.is_empty() {
        return 0;
    }
    let correct = records
        .iter()
        .filter(|r| direction_correct(r.prediction(source), r.actual_outcome()))
        .count();
    (correct as f64 / records.len() as f64 * 100.0).round() as u8
}
