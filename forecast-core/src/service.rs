use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::{
    config::Config,
    error::ForecastError,
    model::WeatherReport,
    provider::{WeatherProvider, fetch_snapshot, weatherapi::WeatherApiProvider},
    query::WeatherQuery,
    summary::{Summarizer, TextGenerator, gemini::GeminiClient},
};

/// Where a request is in its pipeline. `Validating` belongs to the
/// front-ends; the service starts at `FetchingWeather`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    FetchingWeather,
    GeneratingSummary,
    Responding,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Stage::Validating => "validating",
            Stage::FetchingWeather => "fetching_weather",
            Stage::GeneratingSummary => "generating_summary",
            Stage::Responding => "responding",
        })
    }
}

/// Weather lookup followed by summary generation, one step at a time.
///
/// Cheap to clone; the provider clients are shared and read-only.
#[derive(Debug, Clone)]
pub struct ForecastService {
    weather: Arc<dyn WeatherProvider>,
    summarizer: Summarizer,
}

impl ForecastService {
    pub fn new(weather: Arc<dyn WeatherProvider>, generator: Arc<dyn TextGenerator>) -> Self {
        Self { weather, summarizer: Summarizer::new(generator) }
    }

    /// Build the WeatherAPI and Gemini clients from configuration.
    pub fn from_config(config: &Config) -> Result<Self, ForecastError> {
        let weather =
            WeatherApiProvider::new(config.weather_api_key.clone(), &config.settings.weather)?;
        let gemini = GeminiClient::new(config.gemini_api_key.clone(), &config.settings.gemini)?;

        info!(model = gemini.model(), weather_url = %config.settings.weather.base_url, "providers ready");

        Ok(Self::new(Arc::new(weather), Arc::new(gemini)))
    }

    /// Snapshot first, summary second. Any failure discards everything
    /// fetched so far.
    #[instrument(skip_all, fields(city = %query.city(), unit = %query.unit(), days = query.days()))]
    pub async fn report(&self, query: &WeatherQuery) -> Result<WeatherReport, ForecastError> {
        debug!(stage = %Stage::FetchingWeather, "stage entered");
        let snapshot = fetch_snapshot(self.weather.as_ref(), query)
            .await
            .inspect_err(|e| log_failure(Stage::FetchingWeather, e))?;

        debug!(stage = %Stage::GeneratingSummary, "stage entered");
        let summary = self
            .summarizer
            .summarize(&snapshot)
            .await
            .inspect_err(|e| log_failure(Stage::GeneratingSummary, e))?;

        debug!(stage = %Stage::Responding, "stage entered");
        Ok(WeatherReport { weather_data: snapshot, summary })
    }
}

fn log_failure(stage: Stage, err: &ForecastError) {
    warn!(%stage, kind = %err.kind(), error = %err, "request failed");
}
