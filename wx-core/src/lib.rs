//! Core library for the `wx` CLI.
//!
//! This crate defines:
//! - Configuration (config file, `OPENWEATHER_API_KEY`, units)
//! - The OpenWeatherMap HTTP client behind the `WeatherProvider` trait
//! - Mapping of provider JSON into flat weather records
//! - The on-disk favorites list
//!
//! It is used by `wx-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod favorites;
pub mod mapper;
pub mod model;
pub mod provider;

pub use config::{Config, Units};
pub use error::{Result, WeatherError};
pub use favorites::FavoritesStore;
pub use model::{Alert, Endpoint, Forecast, Report, WeatherRecord};
pub use provider::{OpenWeatherClient, WeatherProvider, fetch_report};
