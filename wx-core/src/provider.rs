use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::{
    config::Units,
    error::{Result, WeatherError},
    mapper,
    model::{Endpoint, Report},
};

pub mod openweather;

pub use openweather::OpenWeatherClient;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Perform the request(s) behind `endpoint` and return the decoded JSON body.
    async fn fetch(&self, endpoint: Endpoint, location: &str) -> Result<Value>;

    /// Unit system the provider was asked to report in.
    fn units(&self) -> Units;
}

/// Fetch `endpoint` for `location` and map the body into a [`Report`].
pub async fn fetch_report(
    provider: &dyn WeatherProvider,
    endpoint: Endpoint,
    location: &str,
) -> Result<Report> {
    let body = provider.fetch(endpoint, location).await?;
    mapper::map(endpoint, location, &body, provider.units())
}

/// Locations are passed through verbatim; only emptiness is rejected.
pub(crate) fn ensure_location(location: &str) -> Result<()> {
    if location.trim().is_empty() {
        return Err(WeatherError::usage("Location must not be empty."));
    }
    Ok(())
}
