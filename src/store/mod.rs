//! Durable keyed storage and the repositories built on it.
//!
//! The scoring code never touches a store; callers load collections here and
//! pass them in as plain slices.

pub mod ledger;
pub mod records;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{OracleError, Result};

pub use ledger::VoteLedger;
pub use records::{Leaderboard, RecordBook};

pub const VOTES_KEY: &str = "community-votes";
pub const RECORDS_KEY: &str = "accuracy-history";
pub const USER_STATS_KEY: &str = "user-stats";
pub const FORECAST_KEY: &str = "latest-forecast";

/// Typed get/set over string keys.
pub trait KeyValueStore {
    /// Stored value for `key`, or `default` when nothing was stored yet.
    fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T>;

    fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()>;
}

fn check_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(OracleError::Store(format!("Invalid store key '{}'", key)))
    }
}

/// One pretty-printed JSON file per key under a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T> {
        check_key(key)?;
        let path = self.path(key);
        if !path.exists() {
            debug!("No stored value for '{}', using default", key);
            return Ok(default);
        }
        let data = std::fs::read_to_string(&path)?;
        serde_json::from_str(&data).map_err(|e| {
            OracleError::Store(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        check_key(key)?;
        std::fs::create_dir_all(&self.dir)?;
        let data = serde_json::to_string_pretty(value)?;

        // write-then-rename keeps the stored file whole
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &path)?;
        debug!("Saved '{}' to {}", key, path.display());
        Ok(())
    }
}

/// In-process store holding serialized values.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, serde_json::Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T> {
        check_key(key)?;
        match self.values.get(key) {
            Some(value) => Ok(T::deserialize(value)?),
            None => Ok(default),
        }
    }

    fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        check_key(key)?;
        self.values.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }
}
