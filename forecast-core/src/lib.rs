//! Core library for the `forecast` tool.
//!
//! This crate defines:
//! - Input validation ([`WeatherQuery`])
//! - The weather gateway over WeatherAPI.com
//! - AI summaries through Gemini
//! - The service that runs the two in sequence
//! - Configuration & credentials handling
//!
//! It is used by `forecast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod query;
pub mod service;
pub mod summary;

pub use config::{ApiKey, Config, ConfigError, Settings};
pub use error::{ErrorKind, ForecastError};
pub use model::{CurrentConditions, ForecastDay, WeatherReport, WeatherSnapshot};
pub use provider::{CurrentReading, WeatherProvider};
pub use query::{TemperatureUnit, WeatherQuery};
pub use service::{ForecastService, Stage};
pub use summary::{Summarizer, TextGenerator};
