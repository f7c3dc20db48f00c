use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::{
    config::{Config, Units},
    error::{Result, WeatherError},
    model::Endpoint,
    provider::ensure_location,
};

use super::WeatherProvider;

const CURRENT_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";
const ONECALL_PATH: &str = "/data/3.0/onecall";
const GEOCODE_PATH: &str = "/geo/1.0/direct";

/// OpenWeatherMap REST client.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    units: Units,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String, units: Units, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            units,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Build a client from config. Fails with `Config` when no API key is set.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?;
        Ok(Self::new(api_key.to_owned(), config.units, config.base_url.clone()))
    }

    async fn get_json(&self, path: &str, params: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, ?params, "sending OpenWeather request");

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| network_error(&url, "request failed", e))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| network_error(&url, "failed to read response", e))?;

        tracing::debug!(%url, status = status.as_u16(), "OpenWeather response");

        if !status.is_success() {
            return Err(WeatherError::Provider {
                status: status.as_u16(),
                message: provider_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| WeatherError::Decode(e.to_string()))
    }

    /// Resolve a free-form location to coordinates via the geocoding API.
    async fn coordinates(&self, location: &str) -> Result<(f64, f64)> {
        let body = self.get_json(GEOCODE_PATH, &[("q", location), ("limit", "1")]).await?;

        let first = body.as_array().and_then(|hits| hits.first()).ok_or_else(|| {
            WeatherError::Provider {
                status: 404,
                message: format!("location '{location}' not found"),
            }
        })?;

        let lat = first.get("lat").and_then(Value::as_f64);
        let lon = first.get("lon").and_then(Value::as_f64);
        match (lat, lon) {
            (Some(lat), Some(lon)) => Ok((lat, lon)),
            (None, _) => Err(WeatherError::mapping("[0].lat")),
            (_, None) => Err(WeatherError::mapping("[0].lon")),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn fetch(&self, endpoint: Endpoint, location: &str) -> Result<Value> {
        ensure_location(location)?;
        let units = self.units.as_str();

        match endpoint {
            Endpoint::Current => {
                self.get_json(CURRENT_PATH, &[("q", location), ("units", units)]).await
            }
            Endpoint::Forecast => {
                self.get_json(FORECAST_PATH, &[("q", location), ("units", units)]).await
            }
            Endpoint::Alerts => {
                let (lat, lon) = self.coordinates(location).await?;
                let (lat, lon) = (lat.to_string(), lon.to_string());
                self.get_json(
                    ONECALL_PATH,
                    &[
                        ("lat", lat.as_str()),
                        ("lon", lon.as_str()),
                        ("exclude", "minutely,hourly,daily"),
                        ("units", units),
                    ],
                )
                .await
            }
        }
    }

    fn units(&self) -> Units {
        self.units
    }
}

/// reqwest's error text carries the full request URL, `appid` included.
fn network_error(url: &str, what: &str, e: reqwest::Error) -> WeatherError {
    WeatherError::Network(format!("{what} for {url}: {}", e.without_url()))
}

/// Pull `message` out of an OpenWeather error body, else fall back to the raw text.
fn provider_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_else(|| truncate_body(body))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_message_prefers_json_message() {
        let body = r#"{"cod":"404","message":"city not found"}"#;
        assert_eq!(provider_message(body), "city not found");
    }

    #[test]
    fn provider_message_falls_back_to_truncated_text() {
        let body = "x".repeat(300);
        let msg = provider_message(&body);
        assert_eq!(msg.len(), 203);
        assert!(msg.ends_with("..."));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(250);
        assert!(truncate_body(&body).ends_with("..."));
    }

    #[test]
    fn from_config_requires_key() {
        let err = OpenWeatherClient::from_config(&Config::default()).unwrap_err();
        assert!(matches!(err, WeatherError::Config(_)));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = OpenWeatherClient::new("KEY".into(), Units::Metric, "http://localhost:9/");
        assert_eq!(client.base_url, "http://localhost:9");
    }
}
