use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::{Path, PathBuf}, str::FromStr};

use crate::error::{Result, WeatherError};

/// Environment variable holding the OpenWeatherMap API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Unit system requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    /// Value of the provider's `units` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
            Units::Standard => "K",
        }
    }

    pub fn speed_symbol(&self) -> &'static str {
        match self {
            Units::Imperial => "mph",
            Units::Metric | Units::Standard => "m/s",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = WeatherError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            "standard" => Ok(Units::Standard),
            _ => Err(WeatherError::usage(format!(
                "Unknown units '{value}'. Supported units: metric, imperial, standard."
            ))),
        }
    }
}

/// Settings read from `config.toml`, then overridden by the environment and CLI flags.
///
/// Example TOML:
/// api_key = "..."
/// units = "imperial"
/// favorites_file = "/home/me/favorites.json"
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub units: Units,
    pub base_url: String,
    pub favorites_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            units: Units::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            favorites_file: None,
        }
    }
}

impl Config {
    /// Load config from the platform config directory, or defaults if the file doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    /// Load config from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            WeatherError::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        toml::from_str(&contents).map_err(|e| {
            WeatherError::config(format!("Failed to parse config file {}: {e}", path.display()))
        })
    }

    /// Load a config file the user named explicitly; unlike [`Config::load_from`],
    /// a missing file is an error.
    pub fn load_required(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(WeatherError::config(format!(
                "Config file {} does not exist",
                path.display()
            )));
        }
        Self::load_from(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Apply the value of [`API_KEY_ENV`], if any. Blank values are ignored.
    pub fn with_env_api_key(mut self, value: Option<String>) -> Self {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    /// Convenience helper reading [`API_KEY_ENV`] from the process environment.
    pub fn with_process_env(self) -> Self {
        let value = std::env::var(API_KEY_ENV).ok();
        self.with_env_api_key(value)
    }

    /// Returns the API key or a `Config` error when none is configured.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                WeatherError::config(format!("OpenWeather API key not found; set {API_KEY_ENV}."))
            })
    }

    /// Where favorites live: the configured file, else `favorites.json` in the platform data dir.
    pub fn favorites_path(&self) -> Result<PathBuf> {
        match &self.favorites_file {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join("favorites.json")),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "wx", "wx")
        .ok_or_else(|| WeatherError::config("Could not determine platform config directory"))
}
