use serde::Serialize;

use crate::models::{Probability, Vote};
use crate::scoring::{decile_index, decile_label, DECILES};

/// One bar of the vote histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionBucket {
    pub range_label: String,
    pub count: usize,
    pub percent_of_total: u8,
}

/// Rounded unweighted mean of the vote values.
///
/// `None` when there are no votes; 0 is a legitimate consensus.
pub fn consensus(votes: &[Vote]) -> Option<Probability> {
    if votes.is_empty() {
        return None;
    }
    let total: u64 = votes.iter().map(|v| u64::from(v.value().percent())).sum();
    let mean = (total as f64 / votes.len() as f64).round() as i64;
    // mean of values in 0..=100 stays in range
    Probability::new(mean).ok()
}

/// Vote histogram over all ten deciles, empty ones included.
pub fn distribution(votes: &[Vote]) -> Vec<DistributionBucket> {
    let mut counts = [0usize; DECILES];
    for vote in votes {
        counts[decile_index(vote.value())] += 1;
    }

    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| DistributionBucket {
            range_label: decile_label(i),
            count,
            percent_of_total: if votes.is_empty() {
                0
            } else {
                (count as f64 / votes.len() as f64 * 100.0).round() as u8
            },
        })
        .collect()
}
