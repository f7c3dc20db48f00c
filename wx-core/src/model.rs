use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Units;

/// Which provider endpoint a command talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Current,
    Forecast,
    Alerts,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Current => "current",
            Endpoint::Forecast => "forecast",
            Endpoint::Alerts => "alerts",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat weather snapshot built from one provider response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub location: String,
    pub temperature: f64,
    pub feels_like: Option<f64>,
    pub humidity: u8,
    pub wind_speed: f64,
    pub condition: String,
    pub observed_at: Option<DateTime<Utc>>,
    pub units: Units,
    /// `Some` only for records produced by the alerts endpoint.
    pub alerts: Option<Vec<Alert>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub event: String,
    pub sender: Option<String>,
    pub description: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.event)?;
        if let Some(sender) = &self.sender {
            write!(f, " ({sender})")?;
        }
        Ok(())
    }
}

/// One record per forecast day, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub location: String,
    pub days: Vec<WeatherRecord>,
}

/// Mapped result of one endpoint call.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Current(WeatherRecord),
    Forecast(Forecast),
    Alerts(WeatherRecord),
}

impl Report {
    pub fn location(&self) -> &str {
        match self {
            Report::Current(record) | Report::Alerts(record) => &record.location,
            Report::Forecast(forecast) => &forecast.location,
        }
    }
}
