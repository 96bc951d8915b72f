use serde::Serialize;

use super::{decile_index, decile_label, DECILES};
use crate::models::{AccuracyRecord, Source};

/// One occupied decile of the calibration chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalibrationBucket {
    pub range_label: String,
    /// Centre of the decile, the "ideal calibration" reference.
    pub predicted_midpoint: u8,
    /// Share of outcomes that occurred, rounded percent.
    pub observed_percent: u8,
    pub sample_count: usize,
}

/// Bucket records by the decile of their community prediction.
///
/// Only occupied deciles are returned, in ascending order, so untested
/// ranges never show up as 0% calibration.
pub fn bucket(records: &[AccuracyRecord]) -> Vec<CalibrationBucket> {
    let mut counts = [0usize; DECILES];
    let mut outcomes = [0usize; DECILES];

    for record in records {
        let i = decile_index(record.prediction(Source::Community));
        counts[i] += 1;
        outcomes[i] += usize::from(record.actual_outcome().value());
    }

    (0..DECILES)
        .filter(|&i| counts[i] > 0)
        .map(|i| CalibrationBucket {
            range_label: decile_label(i),
            predicted_midpoint: (i * 10 + 5) as u8,
            observed_percent: (outcomes[i] as f64 / counts[i] as f64 * 100.0).round() as u8,
            sample_count: counts[i],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::test_support::record;

    #[test]
    fn test_only_occupied_deciles() {
        let records = vec![record(0, 50, 5, 0), record(1, 50, 15, 1), record(2, 50, 92, 1)];
        let buckets = bucket(&records);

        let labels: Vec<&str> = buckets.iter().map(|b| b.range_label.as_str()).collect();
        assert_eq!(labels, vec!["0-10%", "10-20%", "90-100%"]);
        assert!(buckets.iter().all(|b| b.sample_count == 1));
        assert_eq!(buckets[0].observed_percent, 0);
        assert_eq!(buckets[1].observed_percent, 100);
        assert_eq!(buckets[2].predicted_midpoint, 95);
    }

    #[test]
    fn test_hundred_lands_in_last_decile() {
        let buckets = bucket(&[record(0, 0, 100, 1), record(1, 0, 90, 0), record(2, 0, 95, 0)]);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].range_label, "90-100%");
        assert_eq!(buckets[0].sample_count, 3);
        assert_eq!(buckets[0].observed_percent, 33);
    }

    #[test]
    fn test_uses_community_prediction_only() {
        let buckets = bucket(&[record(0, 95, 35, 1)]);
        assert_eq!(buckets[0].range_label, "30-40%");
        assert_eq!(buckets[0].predicted_midpoint, 35);
    }

    #[test]
    fn test_empty_history() {
        assert!(bucket(&[]).is_empty());
    }
}
