pub mod feed;
pub mod provider;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{OracleError, Result};
use crate::models::Probability;

pub use feed::ForecastFeed;
pub use provider::{ForecastProvider, HttpForecastProvider};

/// Raw storm measurements for one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    /// Snow accumulation in inches
    pub accumulation: f64,
    /// Wind speed in mph
    pub wind_speed: f64,
    /// Visibility in miles
    pub visibility: f64,
}

impl Measurement {
    pub fn new(accumulation: f64, wind_speed: f64, visibility: f64) -> Result<Self> {
        for (field, value) in [
            ("accumulation", accumulation),
            ("wind_speed", wind_speed),
            ("visibility", visibility),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(OracleError::InvalidMeasurement { field, value });
            }
        }
        Ok(Self { accumulation, wind_speed, visibility })
    }

    pub fn severity(&self) -> SeverityCategory {
        classify(self)
    }
}

/// Storm severity, ordered from mildest to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityCategory {
    Clear,
    LightSnow,
    HeavySnow,
    Blizzard,
}

impl SeverityCategory {
    pub fn label(&self) -> &'static str {
        match self {
            SeverityCategory::Clear => "Clear Skies",
            SeverityCategory::LightSnow => "Light Snow",
            SeverityCategory::HeavySnow => "Heavy Snow",
            SeverityCategory::Blizzard => "Blizzard",
        }
    }
}

impl std::fmt::Display for SeverityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

struct SeverityRule {
    category: SeverityCategory,
    matches: fn(&Measurement) -> bool,
}

fn is_blizzard(m: &Measurement) -> bool {
    m.accumulation >= 6.0 || (m.accumulation >= 3.0 && m.wind_speed >= 25.0) || m.visibility <= 0.25
}

fn is_heavy_snow(m: &Measurement) -> bool {
    m.accumulation >= 2.0 || (m.accumulation >= 1.0 && m.wind_speed >= 15.0) || m.visibility <= 1.0
}

fn is_light_snow(m: &Measurement) -> bool {
    m.accumulation >= 0.5 || m.visibility <= 3.0
}

/// Evaluated top to bottom; the first match wins.
const SEVERITY_RULES: &[SeverityRule] = &[
    SeverityRule { category: SeverityCategory::Blizzard, matches: is_blizzard },
    SeverityRule { category: SeverityCategory::HeavySnow, matches: is_heavy_snow },
    SeverityRule { category: SeverityCategory::LightSnow, matches: is_light_snow },
];

/// Map a measurement to its severity category.
pub fn classify(measurement: &Measurement) -> SeverityCategory {
    SEVERITY_RULES
        .iter()
        .find(|rule| (rule.matches)(measurement))
        .map(|rule| rule.category)
        .unwrap_or(SeverityCategory::Clear)
}

/// Headline call for a model probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    VeryLikely,
    Likely,
    Possible,
    Unlikely,
}

impl Verdict {
    pub fn from_probability(p: Probability) -> Self {
        match p.percent() {
            70..=100 => Verdict::VeryLikely,
            50..=69 => Verdict::Likely,
            30..=49 => Verdict::Possible,
            _ => Verdict::Unlikely,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::VeryLikely => "Very Likely",
            Verdict::Likely => "Likely",
            Verdict::Possible => "Possible",
            Verdict::Unlikely => "Unlikely",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// Forecast snapshot from the external provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    /// Temperature in °F
    pub temperature: f64,
    pub measurement: Measurement,
    pub alerts: Vec<String>,
    pub model_probability: Probability,
    pub observed_at: DateTime<Utc>,
}

impl Forecast {
    pub fn severity(&self) -> SeverityCategory {
        self.measurement.severity()
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_probability(self.model_probability)
    }
}
