//! In-process fakes for the two providers.

use async_trait::async_trait;
use chrono::NaiveDate;
use forecast_core::{
    CurrentConditions, CurrentReading, ForecastDay, ForecastError, TemperatureUnit, TextGenerator,
    WeatherProvider, WeatherQuery,
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

/// Answers every query with fixed Seattle-like data, or always fails.
#[derive(Debug, Clone)]
pub struct FakeWeather {
    fail_with: Option<ForecastError>,
    calls: Arc<AtomicUsize>,
}

impl FakeWeather {
    pub fn ok() -> Self {
        Self { fail_with: None, calls: Arc::default() }
    }

    pub fn failing(err: ForecastError) -> Self {
        Self { fail_with: Some(err), calls: Arc::default() }
    }

    pub fn shared(&self) -> Arc<dyn WeatherProvider> {
        Arc::new(self.clone())
    }

    /// Provider calls so far, current and forecast together.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), ForecastError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

fn temp(unit: TemperatureUnit, celsius: f64, fahrenheit: f64) -> f64 {
    match unit {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => fahrenheit,
    }
}

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn current(&self, query: &WeatherQuery) -> Result<CurrentReading, ForecastError> {
        self.enter()?;
        Ok(CurrentReading {
            location: Some(format!("{}, United States of America", query.city())),
            conditions: CurrentConditions {
                temperature: temp(query.unit(), 11.0, 51.8),
                feels_like: Some(temp(query.unit(), 9.0, 48.2)),
                humidity: 82,
                wind_kph: 9.4,
                condition: "Light rain".into(),
            },
        })
    }

    async fn forecast(&self, query: &WeatherQuery) -> Result<Vec<ForecastDay>, ForecastError> {
        self.enter()?;
        Ok((1..=u32::from(query.days()))
            .map(|d| ForecastDay {
                date: NaiveDate::from_ymd_opt(2024, 3, d).expect("valid date"),
                min_temp: temp(query.unit(), 6.0, 42.8),
                max_temp: temp(query.unit(), 12.0, 53.6),
                avg_temp: None,
                condition: "Patchy rain nearby".into(),
                chance_of_rain: 75,
            })
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct FakeGenerator {
    reply: Result<String, ForecastError>,
    calls: Arc<AtomicUsize>,
}

impl FakeGenerator {
    pub fn replying(text: &str) -> Self {
        Self { reply: Ok(text.to_string()), calls: Arc::default() }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(ForecastError::SummaryGenerationFailed(message.to_string())),
            calls: Arc::default(),
        }
    }

    pub fn shared(&self) -> Arc<dyn TextGenerator> {
        Arc::new(self.clone())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, ForecastError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}
