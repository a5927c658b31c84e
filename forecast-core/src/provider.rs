use async_trait::async_trait;
use std::fmt::Debug;
use tracing::{debug, warn};

use crate::{
    error::ForecastError,
    model::{CurrentConditions, ForecastDay, WeatherSnapshot},
    query::WeatherQuery,
};

pub mod weatherapi;

/// Current conditions as returned by a provider, with the provider's own
/// name for the place if it resolved one.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentReading {
    pub location: Option<String>,
    pub conditions: CurrentConditions,
}

/// A source of current conditions and daily forecasts.
///
/// Implementations pick the temperature fields matching `query.unit()`
/// and never convert between units themselves.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, query: &WeatherQuery) -> Result<CurrentReading, ForecastError>;

    /// Days in the provider's order, which is chronological.
    async fn forecast(&self, query: &WeatherQuery) -> Result<Vec<ForecastDay>, ForecastError>;
}

/// Fetch current conditions, then the forecast, and join them.
///
/// Either failure aborts the whole snapshot.
pub async fn fetch_snapshot(
    provider: &dyn WeatherProvider,
    query: &WeatherQuery,
) -> Result<WeatherSnapshot, ForecastError> {
    let current = provider.current(query).await?;
    let forecast = provider.forecast(query).await?;

    if forecast.is_empty() {
        return Err(ForecastError::ProviderDataMissing("No forecast data found".to_string()));
    }

    // The provider decides how many days it has; a short list is kept as is.
    if forecast.len() != usize::from(query.days()) {
        warn!(
            city = %query.city(),
            requested = query.days(),
            received = forecast.len(),
            "forecast length differs from requested day count"
        );
    }

    debug!(city = %query.city(), days = forecast.len(), "weather snapshot assembled");

    Ok(WeatherSnapshot {
        location: current.location.unwrap_or_else(|| query.city().to_string()),
        unit: query.unit(),
        current: current.conditions,
        forecast,
    })
}
