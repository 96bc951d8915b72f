use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

use super::{Forecast, Measurement};
use crate::config::ForecastConfig;
use crate::error::{OracleError, Result};
use crate::models::Probability;

/// Source of forecast snapshots.
///
/// Failures must come back as [`OracleError::ProviderUnavailable`] so callers
/// can retry without touching data they already hold.
pub trait ForecastProvider {
    fn fetch_forecast(&self) -> impl Future<Output = Result<Forecast>> + Send;
}

/// Deserialize a value that might be a string or a number as f64
fn deserialize_number<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNum {
        Num(f64),
        Str(String),
    }
    match StringOrNum::deserialize(deserializer)? {
        StringOrNum::Num(n) => Ok(n),
        StringOrNum::Str(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

/// Forecast payload as served by the provider endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForecastResponse {
    #[serde(deserialize_with = "deserialize_number")]
    temperature: f64,
    #[serde(alias = "snowfall", deserialize_with = "deserialize_number")]
    accumulation: f64,
    #[serde(deserialize_with = "deserialize_number")]
    wind_speed: f64,
    #[serde(deserialize_with = "deserialize_number")]
    visibility: f64,
    #[serde(default)]
    alerts: Vec<String>,
    #[serde(deserialize_with = "deserialize_number")]
    model_probability: f64,
    #[serde(default, alias = "lastUpdated")]
    observed_at: Option<DateTime<Utc>>,
}

impl TryFrom<ForecastResponse> for Forecast {
    type Error = OracleError;

    fn try_from(resp: ForecastResponse) -> Result<Self> {
        let measurement = Measurement::new(resp.accumulation, resp.wind_speed, resp.visibility)?;
        if !resp.temperature.is_finite() {
            return Err(OracleError::InvalidMeasurement { field: "temperature", value: resp.temperature });
        }
        let model_probability = Probability::from_percent(resp.model_probability)?;
        Ok(Forecast {
            temperature: resp.temperature,
            measurement,
            alerts: resp.alerts,
            model_probability,
            observed_at: resp.observed_at.unwrap_or_else(Utc::now),
        })
    }
}

/// Fetches forecasts as JSON from a configured endpoint.
pub struct HttpForecastProvider {
    http: Client,
    url: String,
}

impl HttpForecastProvider {
    pub fn new(config: &ForecastConfig) -> Result<Self> {
        let url = config
            .url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| OracleError::Config("forecast.url is not set".into()))?;

        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OracleError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http, url })
    }
}

impl ForecastProvider for HttpForecastProvider {
    async fn fetch_forecast(&self) -> Result<Forecast> {
        debug!("Fetching forecast: {}", self.url);

        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| OracleError::ProviderUnavailable(format!("Forecast request failed: {}", e)))?;

        if !resp.status().is_success() {
            return Err(OracleError::ProviderUnavailable(format!(
                "Forecast endpoint returned {}",
                resp.status()
            )));
        }

        let body: ForecastResponse = resp
            .json()
            .await
            .map_err(|e| OracleError::ProviderUnavailable(format!("Failed to parse forecast: {}", e)))?;

        let forecast = Forecast::try_from(body)
            .map_err(|e| OracleError::ProviderUnavailable(format!("Invalid forecast: {}", e)))?;

        info!(
            "Forecast: {:.0}°F | {:.1}in snow | {:.0}mph wind | {:.2}mi visibility | model {}",
            forecast.temperature,
            forecast.measurement.accumulation,
            forecast.measurement.wind_speed,
            forecast.measurement.visibility,
            forecast.model_probability,
        );
        Ok(forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::SeverityCategory;

    fn parse(json: &str) -> Result<Forecast> {
        let resp: ForecastResponse = serde_json::from_str(json)?;
        Forecast::try_from(resp)
    }

    #[test]
    fn test_parse_provider_payload() {
        let forecast = parse(
            r#"{"temperature":18,"snowfall":6,"windSpeed":25,"visibility":0.5,
                "alerts":["Winter Storm Warning until 6 AM"],"modelProbability":85,
                "lastUpdated":"2024-01-15T05:30:00Z"}"#,
        )
        .unwrap();
        assert_eq!(forecast.model_probability.percent(), 85);
        assert_eq!(forecast.alerts.len(), 1);
        assert_eq!(forecast.severity(), SeverityCategory::Blizzard);
        assert_eq!(forecast.observed_at.to_rfc3339(), "2024-01-15T05:30:00+00:00");
    }

    #[test]
    fn test_parse_string_numbers() {
        let forecast = parse(
            r#"{"temperature":"32","accumulation":"1","windSpeed":"10","visibility":"5",
                "modelProbability":"35"}"#,
        )
        .unwrap();
        assert_eq!(forecast.measurement.accumulation, 1.0);
        assert!(forecast.alerts.is_empty());
        assert_eq!(forecast.severity(), SeverityCategory::LightSnow);
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        let bad_probability = r#"{"temperature":30,"snowfall":1,"windSpeed":10,"visibility":5,
            "modelProbability":140}"#;
        assert!(matches!(parse(bad_probability), Err(OracleError::InvalidProbability(v)) if v == 140.0));

        let negative = r#"{"temperature":30,"snowfall":-2,"windSpeed":10,"visibility":5,
            "modelProbability":40}"#;
        assert!(matches!(parse(negative), Err(OracleError::InvalidMeasurement { .. })));

        // fractional values just outside the range must not round back into it
        for probability in [r#""NaN""#, r#""inf""#, "100.4", "-0.4"] {
            let json = format!(
                r#"{{"temperature":30,"snowfall":1,"windSpeed":10,"visibility":5,"modelProbability":{}}}"#,
                probability
            );
            assert!(
                matches!(parse(&json), Err(OracleError::InvalidProbability(_))),
                "accepted modelProbability {}",
                probability
            );
        }

        let nan_temperature = r#"{"temperature":"NaN","snowfall":1,"windSpeed":10,"visibility":5,
            "modelProbability":40}"#;
        assert!(matches!(
            parse(nan_temperature),
            Err(OracleError::InvalidMeasurement { field: "temperature", .. })
        ));
    }

    #[test]
    fn test_parse_rounds_fractional_probability() {
        let forecast = parse(
            r#"{"temperature":30,"snowfall":1,"windSpeed":10,"visibility":5,"modelProbability":99.6}"#,
        )
        .unwrap();
        assert_eq!(forecast.model_probability.percent(), 100);
    }

    #[test]
    fn test_new_requires_url() {
        let config = ForecastConfig::default();
        assert!(matches!(HttpForecastProvider::new(&config), Err(OracleError::Config(_))));
    }
}
