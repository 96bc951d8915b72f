use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;

use super::{KeyValueStore, VOTES_KEY};
use crate::error::{OracleError, Result};
use crate::models::Vote;

/// Append-only vote history with at most one vote per user per day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoteLedger {
    votes: Vec<Vote>,
    /// day -> username -> vote id
    #[serde(default)]
    ballots: BTreeMap<NaiveDate, BTreeMap<String, Uuid>>,
}

impl VoteLedger {
    pub fn load<S: KeyValueStore>(store: &S) -> Result<Self> {
        store.get(VOTES_KEY, Self::default())
    }

    pub fn save<S: KeyValueStore>(&self, store: &mut S) -> Result<()> {
        store.set(VOTES_KEY, self)
    }

    /// Record `user`'s vote for `day`. A second vote for the same day is rejected.
    pub fn submit(&mut self, user: &str, day: NaiveDate, vote: Vote) -> Result<&Vote> {
        let user = user.trim();
        if user.is_empty() {
            return Err(OracleError::Store("Votes need a username".into()));
        }

        let day_ballots = self.ballots.entry(day).or_default();
        if day_ballots.contains_key(user) {
            return Err(OracleError::DuplicateVote { user: user.to_string(), day });
        }
        day_ballots.insert(user.to_string(), vote.id());

        info!("{} voted {} ({}) for {}", user, vote.value(), vote.kind(), day);
        self.votes.push(vote);
        Ok(&self.votes[self.votes.len() - 1])
    }

    /// Every vote ever cast, oldest first.
    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    /// Votes cast for one day.
    pub fn votes_on(&self, day: NaiveDate) -> Vec<Vote> {
        let Some(day_ballots) = self.ballots.get(&day) else {
            return Vec::new();
        };
        self.votes
            .iter()
            .filter(|v| day_ballots.values().any(|id| *id == v.id()))
            .cloned()
            .collect()
    }

    /// `user`'s vote for `day`, if any.
    pub fn ballot(&self, user: &str, day: NaiveDate) -> Option<&Vote> {
        let id = self.ballots.get(&day)?.get(user.trim())?;
        self.votes.iter().find(|v| v.id() == *id)
    }
}
