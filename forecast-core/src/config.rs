use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::PathBuf};
use thiserror::Error;

/// Environment variable holding the WeatherAPI.com key.
pub const WEATHER_API_KEY_VAR: &str = "WEATHER_API_KEY";
/// Environment variable holding the Gemini key.
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Overrides the location of the settings file.
pub const CONFIG_PATH_VAR: &str = "FORECAST_CONFIG";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not set")]
    MissingCredential { var: &'static str },
}

/// A provider credential. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self { base_url: "https://api.weatherapi.com/v1".to_string(), timeout_secs: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash-lite".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 5000 }
    }
}

/// Non-secret settings, optionally read from a TOML file.
///
/// Example TOML:
/// [gemini]
/// model = "gemini-2.5-flash"
///
/// [server]
/// port = 8080
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub weather: WeatherSettings,
    pub gemini: GeminiSettings,
    pub server: ServerSettings,
}

impl Settings {
    /// Load settings from disk, or return defaults if there is no file.
    pub fn load() -> Result<Self> {
        let path = Self::settings_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// `$FORECAST_CONFIG` if set, else `config.toml` in the platform config dir.
    pub fn settings_file_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_VAR) {
            return Ok(PathBuf::from(path));
        }

        let dirs = ProjectDirs::from("dev", "forecast", "forecast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Everything needed to build the provider clients.
#[derive(Debug, Clone)]
pub struct Config {
    pub weather_api_key: ApiKey,
    pub gemini_api_key: ApiKey,
    pub settings: Settings,
}

impl Config {
    /// Read the settings file and both credentials from the process environment.
    pub fn load() -> Result<Self> {
        let settings = Settings::load()?;
        Ok(Self::from_lookup(settings, |var| std::env::var(var).ok())?)
    }

    /// Resolve credentials through `lookup`. Blank values count as missing.
    pub fn from_lookup<F>(settings: Settings, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |var: &'static str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(ApiKey)
                .ok_or(ConfigError::MissingCredential { var })
        };

        Ok(Self {
            weather_api_key: require(WEATHER_API_KEY_VAR)?,
            gemini_api_key: require(GEMINI_API_KEY_VAR)?,
            settings,
        })
    }
}
