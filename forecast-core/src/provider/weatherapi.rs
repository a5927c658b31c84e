use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::{
    config::{ApiKey, WeatherSettings},
    error::ForecastError,
    model::{CurrentConditions, ForecastDay},
    query::{TemperatureUnit, WeatherQuery},
};

use super::{CurrentReading, WeatherProvider};

/// WeatherAPI.com client for the `current.json` and `forecast.json` endpoints.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: ApiKey,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: ApiKey, settings: &WeatherSettings) -> Result<Self, ForecastError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| {
                ForecastError::ProviderUnavailable(format!(
                    "Failed to initialise weather client: {}",
                    e.without_url()
                ))
            })?;

        Ok(Self { api_key, base_url: settings.base_url.trim_end_matches('/').to_string(), http })
    }

    /// GET `{base_url}/{endpoint}` and decode the body.
    ///
    /// `what` names the data in error messages ("current weather", "forecast").
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        what: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ForecastError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.expose())])
            .query(params)
            .send()
            .await
            .map_err(|e| {
                // Display of a reqwest error carries the URL, key included.
                let e = e.without_url();
                warn!(endpoint, error = %e, "weather request failed");
                ForecastError::ProviderUnavailable(format!(
                    "Error fetching {what} data: {}",
                    describe_transport_error(&e)
                ))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            ForecastError::ProviderUnavailable(format!(
                "Error fetching {what} data: failed to read response ({})",
                e.without_url()
            ))
        })?;

        if !status.is_success() {
            warn!(endpoint, %status, body = %truncate_body(&body), "weather provider returned an error");
            return Err(ForecastError::ProviderUnavailable(format!(
                "Error fetching {what} data: {}",
                provider_error_message(status, &body)
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!(endpoint, error = %e, body = %truncate_body(&body), "malformed weather response");
            ForecastError::ProviderUnavailable(format!(
                "Error fetching {what} data: malformed response from weather provider"
            ))
        })
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    #[instrument(skip(self, query), fields(city = %query.city(), unit = %query.unit()))]
    async fn current(&self, query: &WeatherQuery) -> Result<CurrentReading, ForecastError> {
        let parsed: WaCurrentResponse =
            self.get("current.json", "current weather", &[("q", query.city())]).await?;

        let current: WaCurrent = section(parsed.current, "No current weather data found")?;
        let unit = query.unit();

        debug!(condition = %current.condition.text, "current conditions received");

        Ok(CurrentReading {
            location: parsed.location.and_then(WaLocation::label),
            conditions: CurrentConditions {
                temperature: pick(unit, current.temp_c, current.temp_f),
                feels_like: pick_opt(unit, current.feelslike_c, current.feelslike_f),
                humidity: current.humidity,
                wind_kph: current.wind_kph,
                condition: current.condition.text,
            },
        })
    }

    #[instrument(skip(self, query), fields(city = %query.city(), days = query.days()))]
    async fn forecast(&self, query: &WeatherQuery) -> Result<Vec<ForecastDay>, ForecastError> {
        let days = query.days().to_string();
        let parsed: WaForecastResponse = self
            .get("forecast.json", "forecast", &[("q", query.city()), ("days", days.as_str())])
            .await?;

        let forecast: WaForecast = section(parsed.forecast, "No forecast data found")?;
        if forecast.forecastday.is_empty() {
            return Err(ForecastError::ProviderDataMissing("No forecast data found".to_string()));
        }

        let unit = query.unit();
        let result: Vec<ForecastDay> = forecast
            .forecastday
            .into_iter()
            .map(|entry| {
                let day = entry.day;
                ForecastDay {
                    date: entry.date,
                    min_temp: pick(unit, day.mintemp_c, day.mintemp_f),
                    max_temp: pick(unit, day.maxtemp_c, day.maxtemp_f),
                    avg_temp: pick_opt(unit, day.avgtemp_c, day.avgtemp_f),
                    condition: day.condition.text,
                    chance_of_rain: percent(day.daily_chance_of_rain),
                }
            })
            .collect();

        debug!(received = result.len(), "forecast received");
        Ok(result)
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    #[serde(default)]
    name: String,
    #[serde(default)]
    country: String,
}

impl WaLocation {
    fn label(self) -> Option<String> {
        match (self.name.is_empty(), self.country.is_empty()) {
            (true, _) => None,
            (false, true) => Some(self.name),
            (false, false) => Some(format!("{}, {}", self.name, self.country)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    temp_f: f64,
    feelslike_c: Option<f64>,
    feelslike_f: Option<f64>,
    humidity: u8,
    wind_kph: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaCurrentResponse {
    location: Option<WaLocation>,
    current: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct WaDay {
    mintemp_c: f64,
    mintemp_f: f64,
    maxtemp_c: f64,
    maxtemp_f: f64,
    avgtemp_c: Option<f64>,
    avgtemp_f: Option<f64>,
    condition: WaCondition,
    daily_chance_of_rain: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: NaiveDate,
    day: WaDay,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    #[serde(default)]
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    forecast: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct WaErrorBody {
    error: WaErrorDetail,
}

#[derive(Debug, Deserialize)]
struct WaErrorDetail {
    message: String,
}

/// Decode one data section of a response. Absent, null, empty or
/// incomplete sections all mean the provider had nothing for the query.
fn section<T: DeserializeOwned>(value: Option<Value>, missing: &str) -> Result<T, ForecastError> {
    let value = match value {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) if map.is_empty() => None,
        Some(v) => Some(v),
    }
    .ok_or_else(|| ForecastError::ProviderDataMissing(missing.to_string()))?;

    serde_json::from_value(value).map_err(|e| {
        warn!(error = %e, "incomplete weather data section");
        ForecastError::ProviderDataMissing(missing.to_string())
    })
}

fn pick(unit: TemperatureUnit, celsius: f64, fahrenheit: f64) -> f64 {
    match unit {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => fahrenheit,
    }
}

fn pick_opt(unit: TemperatureUnit, celsius: Option<f64>, fahrenheit: Option<f64>) -> Option<f64> {
    match unit {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => fahrenheit,
    }
}

fn percent(value: Option<f64>) -> u8 {
    value.unwrap_or(0.0).clamp(0.0, 100.0).round() as u8
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "weather provider timed out".to_string()
    } else if e.is_connect() {
        "could not connect to weather provider".to_string()
    } else {
        e.to_string()
    }
}

/// The provider's own message when it sent one, else the status line.
fn provider_error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<WaErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| format!("weather provider responded with status {status}"))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
