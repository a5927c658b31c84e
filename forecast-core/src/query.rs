//! Input validation: raw, possibly absent strings in, [`WeatherQuery`] out.
//!
//! The same rule holds for every front-end. An absent field takes its
//! default; a present field must be valid, even if it is blank.

use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, ops::RangeInclusive, str::FromStr};

use crate::error::ForecastError;

pub const DEFAULT_DAYS: u8 = 3;
pub const DAYS_RANGE: RangeInclusive<u8> = 1..=10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "C")]
    Celsius,
    #[serde(rename = "F")]
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "C",
            TemperatureUnit::Fahrenheit => "F",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "degrees Celsius",
            TemperatureUnit::Fahrenheit => "degrees Fahrenheit",
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TemperatureUnit {
    type Error = ForecastError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "c" | "C" => Ok(TemperatureUnit::Celsius),
            "f" | "F" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(ForecastError::invalid_input(format!(
                "Unit must be 'C' or 'F', got '{value}'"
            ))),
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// A validated request: non-empty city, known unit, day count in [1, 10].
///
/// Fields are private so the only way to get one is through validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    city: String,
    unit: TemperatureUnit,
    days: u8,
}

impl WeatherQuery {
    pub fn new(city: &str, unit: TemperatureUnit, days: u8) -> Result<Self, ForecastError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(ForecastError::invalid_input("City name must not be empty"));
        }
        if !DAYS_RANGE.contains(&days) {
            return Err(days_error());
        }

        Ok(Self { city: city.to_string(), unit, days })
    }

    /// Validate raw front-end input.
    ///
    /// `unit` defaults to Celsius and `days` to [`DEFAULT_DAYS`] only when
    /// the field is `None`.
    pub fn parse(
        city: Option<&str>,
        unit: Option<&str>,
        days: Option<&str>,
    ) -> Result<Self, ForecastError> {
        let city = city.unwrap_or_default();
        let unit = match unit {
            Some(raw) => TemperatureUnit::try_from(raw)?,
            None => TemperatureUnit::default(),
        };
        let days = match days {
            Some(raw) => raw.trim().parse::<u8>().map_err(|_| days_error())?,
            None => DEFAULT_DAYS,
        };

        Self::new(city, unit, days)
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    pub fn days(&self) -> u8 {
        self.days
    }
}

fn days_error() -> ForecastError {
    ForecastError::invalid_input(format!(
        "Days must be an integer between {} and {}",
        DAYS_RANGE.start(),
        DAYS_RANGE.end()
    ))
}
