//! Proper-scoring-rule accuracy for resolved predictions.
//!
//! Everything here is a pure function of its inputs.

pub mod accuracy;
pub mod calibration;

use serde::Serialize;

use crate::models::{AccuracyRecord, Outcome, Probability, Source};

pub use accuracy::{accuracy_rate, classify, AccuracyTier};
pub use calibration::{bucket, CalibrationBucket};

/// Number of fixed decile buckets used for calibration and histograms.
pub const DECILES: usize = 10;

/// Brier score of one prediction: `(p/100 - outcome)^2`, always in 0..=1.
pub fn score(prediction: Probability, outcome: Outcome) -> f64 {
    let diff = prediction.fraction() - f64::from(outcome.value());
    diff * diff
}

/// Mean Brier score of one source's predictions over `records`.
///
/// An empty history scores 0 rather than failing.
pub fn aggregate(records: &[AccuracyRecord], source: Source) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let total: f64 = records
        .iter()
        .map(|r| score(r.prediction(source), r.actual_outcome()))
        .sum();
    total / records.len() as f64
}

/// Decile index for a probability. 100 lands in the last bucket.
pub fn decile_index(value: Probability) -> usize {
    (usize::from(value.percent()) / 10).min(DECILES - 1)
}

/// Label for a decile bucket, e.g. `"30-40%"`.
pub fn decile_label(index: usize) -> String {
    format!("{}-{}%", index * 10, (index + 1) * 10)
}

/// Qualitative badge for an aggregate Brier score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BrierRating {
    Excellent,
    Good,
    NeedsImprovement,
}

impl BrierRating {
    pub fn from_score(brier: f64) -> Self {
        if brier < 0.15 {
            BrierRating::Excellent
        } else if brier < 0.25 {
            BrierRating::Good
        } else {
            BrierRating::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BrierRating::Excellent => "Excellent",
            BrierRating::Good => "Good",
            BrierRating::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl std::fmt::Display for BrierRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::record;
    use super::*;

    fn p(v: i64) -> Probability {
        Probability::new(v).unwrap()
    }

    #[test]
    fn test_score_known_values() {
        assert_eq!(score(p(100), Outcome::Occurred), 0.0);
        assert_eq!(score(p(0), Outcome::Occurred), 1.0);
        assert_eq!(score(p(50), Outcome::Occurred), 0.25);
        assert_eq!(score(p(50), Outcome::NotOccurred), 0.25);
        assert!((score(p(85), Outcome::Occurred) - 0.0225).abs() < 1e-12);
    }

    #[test]
    fn test_score_within_unit_interval() {
        for v in 0..=100 {
            for o in [Outcome::NotOccurred, Outcome::Occurred] {
                let s = score(p(v), o);
                let expected = (v as f64 / 100.0 - f64::from(o.value())).powi(2);
                assert!((s - expected).abs() < 1e-12);
                assert!((0.0..=1.0).contains(&s), "score {} out of range", s);
            }
        }
    }

    #[test]
    fn test_aggregate_empty_is_zero() {
        assert_eq!(aggregate(&[], Source::Model), 0.0);
        assert_eq!(aggregate(&[], Source::Community), 0.0);
    }

    #[test]
    fn test_aggregate_mean_per_source() {
        let records = vec![record(0, 90, 60, 1), record(1, 20, 40, 0)];
        // model: 0.01, 0.04 ; community: 0.16, 0.16
        assert!((aggregate(&records, Source::Model) - 0.025).abs() < 1e-12);
        assert!((aggregate(&records, Source::Community) - 0.16).abs() < 1e-12);
    }

    #[test]
    fn test_decile_index_clamps_top() {
        assert_eq!(decile_index(p(0)), 0);
        assert_eq!(decile_index(p(9)), 0);
        assert_eq!(decile_index(p(10)), 1);
        assert_eq!(decile_index(p(99)), 9);
        assert_eq!(decile_index(p(100)), 9);
        assert_eq!(decile_label(9), "90-100%");
    }

    #[test]
    fn test_brier_rating_thresholds() {
        assert_eq!(BrierRating::from_score(0.0), BrierRating::Excellent);
        assert_eq!(BrierRating::from_score(0.149), BrierRating::Excellent);
        assert_eq!(BrierRating::from_score(0.15), BrierRating::Good);
        assert_eq!(BrierRating::from_score(0.25), BrierRating::NeedsImprovement);
        assert_eq!(BrierRating::NeedsImprovement.to_string(), "Needs Improvement");
    }

    #[test]
    fn test_repeated_calls_agree() {
        let records = vec![record(0, 70, 55, 1), record(1, 65, 58, 0)];
        assert_eq!(aggregate(&records, Source::Model), aggregate(&records, Source::Model));
        assert_eq!(score(p(37), Outcome::Occurred), score(p(37), Outcome::Occurred));
    }
}
