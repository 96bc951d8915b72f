use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{OracleError, Result};

pub const CONFIG_FILE: &str = "snowday.toml";

/// Forecast provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Endpoint returning the forecast JSON. Unset means no live provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Number of most recent records shown as the trend
    #[serde(default = "default_trend_window")]
    pub trend_window: usize,
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            trend_window: default_trend_window(),
            leaderboard_size: default_leaderboard_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            forecast: ForecastConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

fn default_timeout() -> u64 { 15 }
fn default_user_agent() -> String { "snowday-oracle/0.1.0".to_string() }
fn default_trend_window() -> usize { 7 }
fn default_leaderboard_size() -> usize { 10 }
fn default_data_dir() -> PathBuf { PathBuf::from(".snowday") }

impl OracleConfig {
    /// Load from `path`, writing the defaults there first if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let data = std::fs::read_to_string(path)?;
            let config: OracleConfig = toml::from_str(&data)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save(path)?;
            info!("Wrote default config to {}", path.display());
            Ok(config)
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = toml::to_string_pretty(self)
            .map_err(|e| OracleError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, data)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.forecast.timeout_secs == 0 {
            return Err(OracleError::Config("forecast.timeout_secs must be positive".into()));
        }
        if self.report.trend_window == 0 {
            return Err(OracleError::Config("report.trend_window must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let config = OracleConfig::load(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.report.trend_window, 7);
        assert_eq!(config.forecast.timeout_secs, 15);
        assert!(config.forecast.url.is_none());
    }

    #[test]
    fn test_partial_file_uses_field_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            "data_dir = \"/var/lib/snowday\"\n\n[forecast]\nurl = \"http://localhost:8080/forecast\"\n",
        )
        .unwrap();

        let config = OracleConfig::load(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/snowday"));
        assert_eq!(config.forecast.url.as_deref(), Some("http://localhost:8080/forecast"));
        assert_eq!(config.forecast.timeout_secs, 15);
        assert_eq!(config.report.leaderboard_size, 10);
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[forecast]\ntimeout_secs = 0\n").unwrap();
        assert!(matches!(OracleConfig::load(&path), Err(OracleError::Config(_))));
    }
}
