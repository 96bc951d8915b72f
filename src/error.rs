use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised by the oracle library.
///
/// Empty datasets are never errors: every aggregate has a neutral fallback.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Probability must be within 0..=100, got {0}")]
    InvalidProbability(f64),

    #[error("Outcome must be 0 or 1, got {0}")]
    InvalidOutcome(i64),

    #[error("Measurement '{field}' must be a non-negative number, got {value}")]
    InvalidMeasurement { field: &'static str, value: f64 },

    #[error("{user} already voted for {day}")]
    DuplicateVote { user: String, day: NaiveDate },

    #[error("An accuracy record for {0} already exists")]
    DuplicateRecord(NaiveDate),

    /// Forecast fetch failed. The caller may retry; cached data is untouched.
    #[error("Forecast provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl OracleError {
    /// Whether retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OracleError::ProviderUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, OracleError>;
