//! Accuracy views assembled from the scoring functions.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{AccuracyRecord, Outcome, Source};
use crate::scoring::{self, AccuracyTier, BrierRating, CalibrationBucket};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSummary {
    pub source: Source,
    pub brier: f64,
    pub accuracy_percent: u8,
    pub rating: BrierRating,
}

impl SourceSummary {
    pub fn compute(records: &[AccuracyRecord], source: Source) -> Self {
        let brier = scoring::aggregate(records, source);
        Self {
            source,
            brier,
            accuracy_percent: scoring::accuracy_rate(records, source),
            rating: BrierRating::from_score(brier),
        }
    }
}

/// Which source has the lower mean Brier score. Ties go to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadToHead {
    pub leader: Source,
    pub margin: f64,
}

impl HeadToHead {
    pub fn compare(model: &SourceSummary, community: &SourceSummary) -> Self {
        let leader = if community.brier < model.brier {
            Source::Community
        } else {
            Source::Model
        };
        Self {
            leader,
            margin: (community.brier - model.brier).abs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonStats {
    pub total_events: usize,
    /// Days the event actually happened
    pub event_days: usize,
    pub model_accuracy: u8,
    pub community_accuracy: u8,
}

impl SeasonStats {
    /// `None` until at least one day has been resolved.
    pub fn compute(records: &[AccuracyRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }
        Some(Self {
            total_events: records.len(),
            event_days: records.iter().filter(|r| r.actual_outcome().occurred()).count(),
            model_accuracy: scoring::accuracy_rate(records, Source::Model),
            community_accuracy: scoring::accuracy_rate(records, Source::Community),
        })
    }
}

/// Per-day breakdown for the history view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordReview {
    pub date: NaiveDate,
    pub outcome: Outcome,
    pub model_tier: AccuracyTier,
    pub community_tier: AccuracyTier,
    pub model_brier: f64,
    pub community_brier: f64,
}

impl RecordReview {
    pub fn of(record: &AccuracyRecord) -> Self {
        let outcome = record.actual_outcome();
        Self {
            date: record.date(),
            outcome,
            model_tier: scoring::classify(record.model_prediction(), outcome),
            community_tier: scoring::classify(record.community_prediction(), outcome),
            model_brier: record.brier_score(Source::Model),
            community_brier: record.brier_score(Source::Community),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracyReport {
    pub model: SourceSummary,
    pub community: SourceSummary,
    pub head_to_head: HeadToHead,
    pub calibration: Vec<CalibrationBucket>,
    pub recent: Vec<AccuracyRecord>,
}

impl AccuracyReport {
    /// Build the report from date-ordered records.
    pub fn build(records: &[AccuracyRecord], trend_window: usize) -> Self {
        let model = SourceSummary::compute(records, Source::Model);
        let community = SourceSummary::compute(records, Source::Community);
        let head_to_head = HeadToHead::compare(&model, &community);
        let start = records.len().saturating_sub(trend_window);

        Self {
            model,
            community,
            head_to_head,
            calibration: scoring::bucket(records),
            recent: records[start..].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::test_support::record;

    fn season() -> Vec<AccuracyRecord> {
        vec![
            record(0, 25, 32, 1),
            record(1, 65, 58, 0),
            record(2, 90, 85, 1),
            record(3, 35, 42, 0),
            record(4, 85, 78, 1),
        ]
    }

    #[test]
    fn test_empty_history_degrades_to_neutral() {
        let report = AccuracyReport::build(&[], 7);
        assert_eq!(report.model.brier, 0.0);
        assert_eq!(report.community.accuracy_percent, 0);
        assert_eq!(report.model.rating, BrierRating::Excellent);
        assert_eq!(report.head_to_head.leader, Source::Model);
        assert_eq!(report.head_to_head.margin, 0.0);
        assert!(report.calibration.is_empty());
        assert!(report.recent.is_empty());
        assert!(SeasonStats::compute(&[]).is_none());
    }

    #[test]
    fn test_report_over_season() {
        let records = season();
        let report = AccuracyReport::build(&records, 3);

        // model: .5625 .4225 .01 .1225 .0225 -> mean .228
        assert!((report.model.brier - 0.228).abs() < 1e-9);
        // community: .4624 .3364 .0225 .1764 .0484 -> mean .20922
        assert!((report.community.brier - 0.20922).abs() < 1e-9);
        assert_eq!(report.model.rating, BrierRating::Good);
        assert_eq!(report.head_to_head.leader, Source::Community);
        assert!((report.head_to_head.margin - 0.01878).abs() < 1e-9);
        assert_eq!(report.model.accuracy_percent, 60);
        assert_eq!(report.recent.len(), 3);
        assert_eq!(report.recent[0].date(), records[2].date());

        let total: usize = report.calibration.iter().map(|b| b.sample_count).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn test_season_stats() {
        let stats = SeasonStats::compute(&season()).unwrap();
        assert_eq!(stats.total_events, 5);
        assert_eq!(stats.event_days, 3);
        assert_eq!(stats.model_accuracy, 60);
        assert_eq!(stats.community_accuracy, 60);
    }

    #[test]
    fn test_record_review() {
        let review = RecordReview::of(&record(0, 25, 32, 1));
        assert_eq!(review.model_tier, AccuracyTier::Miss);
        assert_eq!(review.community_tier, AccuracyTier::Miss);
        assert!((review.model_brier - 0.5625).abs() < 1e-12);

        let review = RecordReview::of(&record(1, 90, 55, 1));
        assert_eq!(review.model_tier, AccuracyTier::Excellent);
        assert_eq!(review.community_tier, AccuracyTier::Lucky);
    }
}
