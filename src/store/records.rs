use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{KeyValueStore, RECORDS_KEY, USER_STATS_KEY};
use crate::error::{OracleError, Result};
use crate::models::{AccuracyRecord, UserStat};

/// Resolved days, one record per date, kept in date order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordBook {
    records: Vec<AccuracyRecord>,
}

impl RecordBook {
    pub fn load<S: KeyValueStore>(store: &S) -> Result<Self> {
        let mut book: RecordBook = store.get(RECORDS_KEY, Self::default())?;
        book.records.sort_by_key(|r| r.date());
        if let Some(pair) = book.records.windows(2).find(|w| w[0].date() == w[1].date()) {
            return Err(OracleError::DuplicateRecord(pair[0].date()));
        }
        Ok(book)
    }

    pub fn save<S: KeyValueStore>(&self, store: &mut S) -> Result<()> {
        store.set(RECORDS_KEY, self)
    }

    /// Add a finalized record. Records are never replaced.
    pub fn append(&mut self, record: AccuracyRecord) -> Result<()> {
        let pos = self.records.partition_point(|r| r.date() < record.date());
        if self.records.get(pos).is_some_and(|r| r.date() == record.date()) {
            return Err(OracleError::DuplicateRecord(record.date()));
        }
        info!(
            "Resolved {}: outcome {} | model {} | community {}",
            record.date(),
            record.actual_outcome(),
            record.model_prediction(),
            record.community_prediction()
        );
        self.records.insert(pos, record);
        Ok(())
    }

    pub fn records(&self) -> &[AccuracyRecord] {
        &self.records
    }

    pub fn get(&self, date: NaiveDate) -> Option<&AccuracyRecord> {
        self.records.iter().find(|r| r.date() == date)
    }

    /// The last `n` records, oldest first.
    pub fn recent(&self, n: usize) -> &[AccuracyRecord] {
        &self.records[self.records.len().saturating_sub(n)..]
    }
}

/// Externally maintained forecaster standings.
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    stats: Vec<UserStat>,
}

impl Leaderboard {
    /// Load stored standings, dropping entries that fail validation.
    pub fn load<S: KeyValueStore>(store: &S) -> Result<Self> {
        let stored: Vec<UserStat> = store.get(USER_STATS_KEY, Vec::new())?;
        let stats = stored
            .into_iter()
            .filter(|s| match s.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!("Skipping leaderboard entry: {}", e);
                    false
                }
            })
            .collect();
        Ok(Self { stats })
    }

    pub fn save<S: KeyValueStore>(&self, store: &mut S) -> Result<()> {
        store.set(USER_STATS_KEY, &self.stats)
    }

    /// Insert or replace the entry for `stat.username`.
    pub fn upsert(&mut self, stat: UserStat) -> Result<()> {
        stat.validate()?;
        match self.stats.iter_mut().find(|s| s.username == stat.username) {
            Some(existing) => *existing = stat,
            None => self.stats.push(stat),
        }
        Ok(())
    }

    pub fn stats(&self) -> &[UserStat] {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::test_support::record;
    use crate::store::MemoryStore;
    use chrono::Datelike;
    use std::collections::BTreeSet;

    #[test]
    fn test_append_keeps_date_order() {
        let mut book = RecordBook::default();
        book.append(record(5, 60, 55, 1)).unwrap();
        book.append(record(1, 30, 40, 0)).unwrap();
        book.append(record(3, 70, 65, 1)).unwrap();

        let days: Vec<u32> = book.records().iter().map(|r| r.date().day()).collect();
        assert_eq!(days, vec![2, 4, 6]);
    }

    #[test]
    fn test_append_rejects_same_day() {
        let mut book = RecordBook::default();
        book.append(record(1, 30, 40, 0)).unwrap();
        let err = book.append(record(1, 90, 90, 1)).unwrap_err();
        assert!(matches!(err, OracleError::DuplicateRecord(_)));
        assert_eq!(book.records()[0].model_prediction().percent(), 30);
    }

    #[test]
    fn test_recent_window() {
        let mut book = RecordBook::default();
        for n in 0..10 {
            book.append(record(n, 50, 50, 0)).unwrap();
        }
        let recent = book.recent(7);
        assert_eq!(recent.len(), 7);
        assert_eq!(recent[0].date(), record(3, 0, 0, 0).date());
        assert_eq!(book.recent(50).len(), 10);
        assert!(RecordBook::default().recent(7).is_empty());
    }

    #[test]
    fn test_record_book_persists_as_plain_list() {
        let mut store = MemoryStore::new();
        let mut book = RecordBook::default();
        book.append(record(0, 85, 78, 1)).unwrap();
        book.save(&mut store).unwrap();

        let raw: Vec<serde_json::Value> = store.get(RECORDS_KEY, Vec::new()).unwrap();
        assert_eq!(raw.len(), 1);
        assert_eq!(RecordBook::load(&store).unwrap().records(), book.records());
    }

    #[test]
    fn test_load_rejects_two_records_for_one_day() {
        let mut store = MemoryStore::new();
        let stored = vec![record(2, 40, 40, 0), record(0, 85, 78, 1), record(0, 10, 10, 0)];
        store.set(RECORDS_KEY, &stored).unwrap();

        let err = RecordBook::load(&store).unwrap_err();
        assert!(matches!(err, OracleError::DuplicateRecord(d) if d == record(0, 0, 0, 0).date()));
    }

    #[test]
    fn test_leaderboard_skips_invalid_entries() {
        let mut store = MemoryStore::new();
        let raw = serde_json::json!([
            {"username":"WeatherWiz","brierScore":0.15,"totalVotes":45,"accuracy":78,"streak":7,"badges":[]},
            {"username":"Broken","brierScore":4.0,"totalVotes":1,"accuracy":10,"streak":0,"badges":[]}
        ]);
        store.set(USER_STATS_KEY, &raw).unwrap();

        let board = Leaderboard::load(&store).unwrap();
        assert_eq!(board.stats().len(), 1);
        assert_eq!(board.stats()[0].username, "WeatherWiz");
    }

    #[test]
    fn test_upsert_replaces_by_username() {
        let mut board = Leaderboard::default();
        let mut stat = UserStat {
            username: "MeteoMike".into(),
            brier_score: 0.25,
            total_votes: 41,
            accuracy_percent: 65,
            streak: 0,
            badges: BTreeSet::new(),
        };
        board.upsert(stat.clone()).unwrap();
        stat.streak = 3;
        board.upsert(stat).unwrap();
        assert_eq!(board.stats().len(), 1);
        assert_eq!(board.stats()[0].streak, 3);
    }
}
