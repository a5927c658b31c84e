use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::query::TemperatureUnit;

/// Conditions right now, temperatures in the unit that was requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feels_like: Option<f64>,
    pub humidity: u8,
    pub wind_kph: f64,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub min_temp: f64,
    pub max_temp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_temp: Option<f64>,
    pub condition: String,
    pub chance_of_rain: u8,
}

/// Current conditions plus the day-by-day forecast for one query.
///
/// Only built from two successful provider responses; there is no way to
/// hold one half without the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: String,
    pub unit: TemperatureUnit,
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastDay>,
}

/// What a successful request hands back to its caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub weather_data: WeatherSnapshot,
    pub summary: String,
}
