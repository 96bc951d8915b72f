use std::time::Duration;
use tracing::{info, warn};

use super::{Forecast, ForecastProvider};
use crate::error::{OracleError, Result};

/// Last good forecast plus the provider that refreshes it.
///
/// `refresh` borrows the feed mutably, so only one request is ever in flight.
/// Dropping an unfinished refresh cancels it and leaves the cached forecast
/// as it was; so does a failed one.
pub struct ForecastFeed<P> {
    provider: P,
    timeout: Duration,
    latest: Option<Forecast>,
}

impl<P: ForecastProvider> ForecastFeed<P> {
    pub fn new(provider: P, timeout: Duration) -> Self {
        Self { provider, timeout, latest: None }
    }

    /// Seed the feed with a previously stored forecast.
    pub fn with_cached(mut self, forecast: Option<Forecast>) -> Self {
        self.latest = forecast;
        self
    }

    pub fn latest(&self) -> Option<&Forecast> {
        self.latest.as_ref()
    }

    pub async fn refresh(&mut self) -> Result<&Forecast> {
        let fetched = tokio::time::timeout(self.timeout, self.provider.fetch_forecast()).await;

        let forecast = match fetched {
            Ok(Ok(forecast)) => forecast,
            Ok(Err(e)) => {
                warn!("Forecast refresh failed, keeping cached data: {}", e);
                return Err(e);
            }
            Err(_) => {
                warn!("Forecast refresh timed out after {:?}, keeping cached data", self.timeout);
                return Err(OracleError::ProviderUnavailable(format!(
                    "timed out after {}s",
                    self.timeout.as_secs_f64()
                )));
            }
        };

        info!("Forecast refreshed: {} ({})", forecast.severity(), forecast.verdict());
        let latest: &Forecast = self.latest.insert(forecast);
        Ok(latest)
    }
}
