//! Extracts [`WeatherRecord`]s from raw OpenWeather JSON.
//!
//! Each endpoint has its own payload shape and its own mapping function.
//! Required fields that are missing or mistyped fail with
//! [`WeatherError::Mapping`] naming the field path; a record is never
//! partially populated.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{
    config::Units,
    error::{Result, WeatherError},
    model::{Alert, Endpoint, Forecast, Report, WeatherRecord},
};

/// The forecast endpoint returns 3-hourly slots; eight of them make a day.
const SLOTS_PER_DAY: usize = 8;

pub fn map(endpoint: Endpoint, location: &str, body: &Value, units: Units) -> Result<Report> {
    match endpoint {
        Endpoint::Current => map_current(body, units).map(Report::Current),
        Endpoint::Forecast => map_forecast(body, units).map(Report::Forecast),
        Endpoint::Alerts => map_alerts(location, body, units).map(Report::Alerts),
    }
}

/// `/data/2.5/weather` payload.
pub fn map_current(body: &Value, units: Units) -> Result<WeatherRecord> {
    let name = str_at(body, "name", "/name")?;
    let location = with_country(name, body.pointer("/sys/country"));

    Ok(WeatherRecord {
        location,
        temperature: f64_at(body, "main.temp", "/main/temp")?,
        feels_like: body.pointer("/main/feels_like").and_then(Value::as_f64),
        humidity: humidity_at(body, "main.humidity", "/main/humidity")?,
        wind_speed: f64_at(body, "wind.speed", "/wind/speed")?,
        condition: str_at(body, "weather[0].description", "/weather/0/description")?.to_owned(),
        observed_at: timestamp(body.get("dt")),
        units,
        alerts: None,
    })
}

/// `/data/2.5/forecast` payload, collapsed to one record per day.
pub fn map_forecast(body: &Value, units: Units) -> Result<Forecast> {
    let name = str_at(body, "city.name", "/city/name")?;
    let location = with_country(name, body.pointer("/city/country"));

    let slots = body
        .get("list")
        .and_then(Value::as_array)
        .filter(|list| !list.is_empty())
        .ok_or_else(|| WeatherError::mapping("list"))?;

    let days = slots
        .iter()
        .enumerate()
        .step_by(SLOTS_PER_DAY)
        .map(|(i, slot)| {
            let field = |name: &str| format!("list[{i}].{name}");
            Ok(WeatherRecord {
                location: location.clone(),
                temperature: f64_at(slot, &field("main.temp"), "/main/temp")?,
                feels_like: slot.pointer("/main/feels_like").and_then(Value::as_f64),
                humidity: humidity_at(slot, &field("main.humidity"), "/main/humidity")?,
                wind_speed: f64_at(slot, &field("wind.speed"), "/wind/speed")?,
                condition: str_at(slot, &field("weather[0].description"), "/weather/0/description")?
                    .to_owned(),
                observed_at: timestamp(slot.get("dt")),
                units,
                alerts: None,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Forecast { location, days })
}

/// `/data/3.0/onecall` payload. It carries no place name, so the requested
/// location string labels the record.
pub fn map_alerts(location: &str, body: &Value, units: Units) -> Result<WeatherRecord> {
    let alerts = match body.get("alerts") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| map_alert(i, item))
            .collect::<Result<Vec<_>>>()?,
        Some(_) => return Err(WeatherError::mapping("alerts")),
    };

    Ok(WeatherRecord {
        location: location.to_owned(),
        temperature: f64_at(body, "current.temp", "/current/temp")?,
        feels_like: body.pointer("/current/feels_like").and_then(Value::as_f64),
        humidity: humidity_at(body, "current.humidity", "/current/humidity")?,
        wind_speed: f64_at(body, "current.wind_speed", "/current/wind_speed")?,
        condition: str_at(body, "current.weather[0].description", "/current/weather/0/description")?
            .to_owned(),
        observed_at: timestamp(body.pointer("/current/dt")),
        units,
        alerts: Some(alerts),
    })
}

fn map_alert(index: usize, item: &Value) -> Result<Alert> {
    let event = str_at(item, &format!("alerts[{index}].event"), "/event")?;

    Ok(Alert {
        event: event.to_owned(),
        sender: item.get("sender_name").and_then(Value::as_str).map(str::to_owned),
        description: item
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_owned(),
        start: timestamp(item.get("start")),
        end: timestamp(item.get("end")),
    })
}

fn f64_at(body: &Value, field: &str, pointer: &str) -> Result<f64> {
    body.pointer(pointer)
        .and_then(Value::as_f64)
        .ok_or_else(|| WeatherError::mapping(field))
}

fn str_at<'a>(body: &'a Value, field: &str, pointer: &str) -> Result<&'a str> {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .ok_or_else(|| WeatherError::mapping(field))
}

fn humidity_at(body: &Value, field: &str, pointer: &str) -> Result<u8> {
    body.pointer(pointer)
        .and_then(Value::as_u64)
        .and_then(|h| u8::try_from(h).ok())
        .ok_or_else(|| WeatherError::mapping(field))
}

fn with_country(name: &str, country: Option<&Value>) -> String {
    match country.and_then(Value::as_str).filter(|c| !c.is_empty()) {
        Some(country) => format!("{name}, {country}"),
        None => name.to_owned(),
    }
}

fn timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    value.and_then(Value::as_i64).and_then(|ts| DateTime::from_timestamp(ts, 0))
}
