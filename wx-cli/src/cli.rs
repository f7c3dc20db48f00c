use clap::{Parser, Subcommand, error::ErrorKind};
use colored::Colorize;
use std::{
    ffi::OsString,
    io::{IsTerminal, Write},
    path::{Path, PathBuf},
};

use wx_core::{
    Config, Endpoint, FavoritesStore, OpenWeatherClient, Result, Units, WeatherError,
    WeatherProvider, fetch_report,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wx", version, about = "Current weather, forecasts and alerts from OpenWeatherMap")]
pub struct Cli {
    /// Path to config.toml (defaults to the platform config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Unit system: metric, imperial or standard.
    #[arg(long, global = true)]
    pub units: Option<Units>,

    /// Where favorites are stored.
    #[arg(long, global = true, env = "WX_FAVORITES_FILE")]
    pub favorites_file: Option<PathBuf>,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show current weather for a location.
    Current {
        /// Location name, e.g. "Paris, FR".
        location: String,
    },

    /// Show the 5-day forecast for a location.
    Forecast {
        /// Location name, e.g. "Paris, FR".
        location: String,
    },

    /// Save a location to favorites.
    AddFavorite {
        /// Location name, stored exactly as given.
        location: String,
    },

    /// Show current weather for every saved location.
    Favorites,

    /// Show active weather alerts for a location.
    Alerts {
        /// Location name, e.g. "Paris, FR".
        location: String,
    },
}

impl Cli {
    /// Parse arguments, turning any clap usage error into [`WeatherError::Usage`].
    ///
    /// `--help` and `--version` print and exit the process with status 0.
    pub fn from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args).map_err(|e| match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let rendered = e.to_string();
                let message = rendered.trim_end();
                WeatherError::usage(message.strip_prefix("error: ").unwrap_or(message))
            }
        })
    }

    pub async fn run(self, out: &mut dyn Write) -> Result<()> {
        let config = self.resolve_config()?;
        execute(self.command, &config, out).await
    }

    /// Config file, then `OPENWEATHER_API_KEY`, then command-line flags.
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_required(path)?,
            None => Config::load()?,
        }
        .with_process_env();

        if let Some(units) = self.units {
            config.units = units;
        }
        if let Some(path) = &self.favorites_file {
            config.favorites_file = Some(path.clone());
        }
        Ok(config)
    }
}

/// Run one command against the provider described by `config`.
///
/// The API key is checked before anything else, so a missing key never
/// reaches the network or the favorites file.
pub async fn execute(command: Command, config: &Config, out: &mut dyn Write) -> Result<()> {
    let provider = OpenWeatherClient::from_config(config)?;
    let favorites_path = config.favorites_path()?;

    tracing::debug!(?command, units = %config.units, "dispatching command");
    dispatch(command, &provider, &favorites_path, out).await
}

pub async fn dispatch(
    command: Command,
    provider: &dyn WeatherProvider,
    favorites_path: &Path,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::Current { location } => show(provider, Endpoint::Current, &location, out).await,
        Command::Forecast { location } => show(provider, Endpoint::Forecast, &location, out).await,
        Command::Alerts { location } => show(provider, Endpoint::Alerts, &location, out).await,
        Command::AddFavorite { location } => add_favorite(provider, favorites_path, location, out).await,
        Command::Favorites => show_favorites(provider, favorites_path, out).await,
    }
}

async fn show(
    provider: &dyn WeatherProvider,
    endpoint: Endpoint,
    location: &str,
    out: &mut dyn Write,
) -> Result<()> {
    status(output::fetching(endpoint, location, None));
    let report = fetch_report(provider, endpoint, location).await?;
    out.write_all(output::report(&report).as_bytes())?;
    Ok(())
}

/// Progress goes to stderr, and only when a person is watching it.
fn status(message: String) {
    let mut stderr = std::io::stderr();
    if stderr.is_terminal() {
        let _ = writeln!(stderr, "{}", message.dimmed());
    }
}

async fn add_favorite(
    provider: &dyn WeatherProvider,
    favorites_path: &Path,
    location: String,
    out: &mut dyn Write,
) -> Result<()> {
    let mut store = FavoritesStore::load(favorites_path)?;

    // Only save locations the provider can resolve.
    status(output::fetching(Endpoint::Current, &location, None));
    fetch_report(provider, Endpoint::Current, &location).await?;

    store.add(location.as_str())?;
    out.write_all(output::favorite_added(&location).as_bytes())?;
    Ok(())
}

async fn show_favorites(
    provider: &dyn WeatherProvider,
    favorites_path: &Path,
    out: &mut dyn Write,
) -> Result<()> {
    let store = FavoritesStore::load(favorites_path)?;
    let locations = store.list();

    if locations.is_empty() {
        out.write_all(output::no_favorites().as_bytes())?;
        return Ok(());
    }

    let mut failed = 0;
    for (i, location) in locations.iter().enumerate() {
        status(output::fetching(Endpoint::Current, location, Some((i + 1, locations.len()))));
        match fetch_report(provider, Endpoint::Current, location).await {
            Ok(report) => {
                out.write_all(output::favorite_heading(location).as_bytes())?;
                out.write_all(output::report(&report).as_bytes())?;
            }
            Err(err) => {
                tracing::warn!(%location, error = %err, "favorite lookup failed");
                failed += 1;
                out.write_all(output::favorite_failed(location, &err).as_bytes())?;
            }
        }
    }

    if failed > 0 {
        return Err(WeatherError::FavoritesIncomplete { failed, total: locations.len() });
    }
    Ok(())
}
