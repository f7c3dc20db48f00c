//! Terminal rendering of weather records and favorites.
//!
//! Every function returns a `String`; the dispatcher decides where it goes.
//! Styling comes from `colored`, which honours `NO_COLOR`.

use chrono::{DateTime, Utc};
use colored::Colorize;
use std::fmt::Write;

use wx_core::{Alert, Endpoint, Forecast, Report, WeatherRecord};

const LABEL_WIDTH: usize = 12;

pub fn report(report: &Report) -> String {
    match report {
        Report::Current(record) => current(record),
        Report::Forecast(f) => forecast(f),
        Report::Alerts(record) => alerts(record),
    }
}

/// Titled key/value block for current conditions.
pub fn current(record: &WeatherRecord) -> String {
    let temp_unit = record.units.temperature_symbol();
    let speed_unit = record.units.speed_symbol();

    let mut out = String::new();
    let _ = writeln!(out, "{}", format!("Current Weather in {}", record.location).bold());
    row(&mut out, "Weather", capitalize(&record.condition));
    row(&mut out, "Temperature", format!("{:.1}{temp_unit}", record.temperature));
    if let Some(feels_like) = record.feels_like {
        row(&mut out, "Feels Like", format!("{feels_like:.1}{temp_unit}"));
    }
    row(&mut out, "Humidity", format!("{}%", record.humidity));
    row(&mut out, "Wind Speed", format!("{:.1} {speed_unit}", record.wind_speed));
    out
}

/// One row per forecast day.
pub fn forecast(forecast: &Forecast) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        format!("{}-Day Forecast for {}", forecast.days.len(), forecast.location).bold()
    );

    let (temp_unit, speed_unit) = forecast
        .days
        .first()
        .map(|d| (d.units.temperature_symbol(), d.units.speed_symbol()))
        .unwrap_or(("°C", "m/s"));

    let header = format!(
        "{:<10}  {:<24}  {:>9}  {:>8}  {:>10}",
        "Date",
        "Weather",
        format!("Temp ({temp_unit})"),
        "Humidity",
        format!("Wind ({speed_unit})"),
    );
    let _ = writeln!(out, "{}", header.cyan());

    for day in &forecast.days {
        let _ = writeln!(out, "{}", forecast_row(day));
    }
    out
}

// Cells are padded before they are colored; colored ignores width for styled text.
fn forecast_row(day: &WeatherRecord) -> String {
    let date = day
        .observed_at
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".into());
    let temp = format!("{:>9}", format!("{:.1}", day.temperature));
    let humidity = format!("{:>8}", format!("{}%", day.humidity));
    let wind = format!("{:>10}", format!("{:.1}", day.wind_speed));

    format!(
        "{:<10}  {:<24}  {}  {}  {}",
        date,
        capitalize(&day.condition),
        temp.yellow(),
        humidity.blue(),
        wind.magenta(),
    )
}

/// Status line shown on stderr while a request is in flight.
pub fn fetching(endpoint: Endpoint, location: &str, progress: Option<(usize, usize)>) -> String {
    let what = match endpoint {
        Endpoint::Current => "weather data",
        Endpoint::Forecast => "forecast data",
        Endpoint::Alerts => "weather alerts",
    };
    match progress {
        Some((n, total)) => format!("Fetching {what} for {location} ({n}/{total})..."),
        None => format!("Fetching {what} for {location}..."),
    }
}

/// A panel per active alert, or a single all-clear line.
pub fn alerts(record: &WeatherRecord) -> String {
    let alerts = record.alerts.as_deref().unwrap_or_default();
    if alerts.is_empty() {
        return format!("{}\n", format!("No weather alerts for {}", record.location).green());
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", format!("Weather Alerts for {}", record.location).bold());
    for alert in alerts {
        alert_panel(&mut out, alert);
    }
    out
}

pub fn favorite_added(location: &str) -> String {
    format!("Added {} to favorites!\n", location.green())
}

pub fn no_favorites() -> String {
    "No favorite locations saved.\n".to_string()
}

pub fn favorite_heading(location: &str) -> String {
    format!("\nWeather for {}:\n", location.bold())
}

pub fn favorite_failed(location: &str, error: &impl std::fmt::Display) -> String {
    format!("{}\n", format!("Error getting weather for {location}: {error}").red())
}

fn alert_panel(out: &mut String, alert: &Alert) {
    let rule = "─".repeat(48);
    let _ = writeln!(out, "{}", rule.red());
    let _ = writeln!(out, "{}", format!("Alert: {alert}").red().bold());
    if !alert.description.is_empty() {
        let _ = writeln!(out, "\n{}\n", alert.description);
    }
    let _ = writeln!(out, "Start: {}", timestamp(alert.start));
    let _ = writeln!(out, "End:   {}", timestamp(alert.end));
    let _ = writeln!(out, "{}", rule.red());
}

fn row(out: &mut String, label: &str, value: String) {
    let _ = writeln!(out, "  {}  {}", format!("{label:<width$}", width = LABEL_WIDTH).cyan(), value.green());
}

fn timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Drops SGR escape sequences so tests can compare visible text.
#[cfg(test)]
pub(crate) fn strip_ansi(text: &str) -> String {
    let mut out = String::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            chars.by_ref().find(|&c| c == 'm');
        } else {
            out.push(c);
        }
    }
    out
}
