//! Scoring, calibration and classification for snow-day predictions.
//!
//! Model and crowd forecasts are compared with the Brier score once the
//! outcome is known; crowd votes reduce to a consensus; storm measurements
//! map to an ordered severity category.

pub mod config;
pub mod crowd;
pub mod error;
pub mod models;
pub mod report;
pub mod scoring;
pub mod store;
pub mod weather;

pub use error::{OracleError, Result};
pub use models::{AccuracyRecord, EventDetails, Outcome, Probability, Source, UserStat, Vote, VoteKind};
pub use weather::{Measurement, SeverityCategory};
