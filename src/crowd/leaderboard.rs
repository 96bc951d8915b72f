use std::cmp::Ordering;

use crate::models::UserStat;

/// Rank forecasters by Brier score, lowest first.
///
/// Ties go to the user with more votes, then alphabetically.
/// At most `limit` entries are returned.
pub fn rank(stats: &[UserStat], limit: usize) -> Vec<&UserStat> {
    let mut ranked: Vec<&UserStat> = stats.iter().collect();
    ranked.sort_by(|a, b| {
        a.brier_score
            .partial_cmp(&b.brier_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.total_votes.cmp(&a.total_votes))
            .then_with(|| a.username.cmp(&b.username))
    });
    ranked.truncate(limit);
    ranked
}
