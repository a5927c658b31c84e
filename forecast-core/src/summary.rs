use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use tracing::{debug, instrument};

use crate::{error::ForecastError, model::WeatherSnapshot};

pub mod gemini;

/// Single-turn text generation: one prompt in, one reply out.
#[async_trait]
pub trait TextGenerator: Send + Sync + Debug {
    async fn generate(&self, prompt: &str) -> Result<String, ForecastError>;
}

const INSTRUCTIONS: &str = "\
You are a friendly weather assistant. Using the weather data below, write a short, \
user-friendly summary for someone who is not a weather expert. Describe the current \
conditions, then how the coming days look. Suggest what to wear, and warn clearly \
about any day with a high chance of rain. Write plain sentences in one or two short \
paragraphs. Do not use markdown, bullet points, headings, emoji, or technical jargon.";

/// Turns a [`WeatherSnapshot`] into prose through a [`TextGenerator`].
#[derive(Debug, Clone)]
pub struct Summarizer {
    generator: Arc<dyn TextGenerator>,
}

impl Summarizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    #[instrument(skip_all, fields(location = %snapshot.location))]
    pub async fn summarize(&self, snapshot: &WeatherSnapshot) -> Result<String, ForecastError> {
        let prompt = build_prompt(snapshot)?;

        let reply = self.generator.generate(&prompt).await.map_err(|e| match e {
            ForecastError::SummaryGenerationFailed(_) => e,
            other => ForecastError::SummaryGenerationFailed(format!(
                "Error generating AI summary: {other}"
            )),
        })?;

        let summary = reply.trim();
        if summary.is_empty() {
            return Err(ForecastError::SummaryGenerationFailed(
                "Error generating AI summary: the model returned no text".to_string(),
            ));
        }

        debug!(chars = summary.len(), "summary generated");
        Ok(summary.to_string())
    }
}

/// Render the prompt sent to the model. Rejects a snapshot with no forecast.
pub fn build_prompt(snapshot: &WeatherSnapshot) -> Result<String, ForecastError> {
    if snapshot.forecast.is_empty() {
        return Err(ForecastError::invalid_input("No weather data to summarize"));
    }

    let data = serde_json::to_string_pretty(snapshot).map_err(|e| {
        ForecastError::invalid_input(format!("Weather data could not be serialized: {e}"))
    })?;

    Ok(format!(
        "{INSTRUCTIONS}\n\n\
         Location: {}\n\
         Temperatures are in {}. Wind speed is in km/h. Humidity and chance_of_rain are percentages.\n\n\
         Weather data:\n{data}\n",
        snapshot.location,
        snapshot.unit.label(),
    ))
}
