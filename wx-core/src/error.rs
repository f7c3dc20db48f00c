//! Error taxonomy shared by the library and the `wx` binary.
//!
//! Every variant is terminal for the current invocation; the binary prints
//! it and exits with status 1.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum WeatherError {
    /// Missing API key or an unusable config file.
    #[error("configuration error: {0}")]
    Config(String),

    /// Bad command-line invocation.
    #[error("{0}")]
    Usage(String),

    /// The request never produced a response (DNS, connect, TLS, body read).
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with a non-2xx status.
    #[error("provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    /// The response body was not valid JSON.
    #[error("could not decode provider response: {0}")]
    Decode(String),

    /// A field the mapper needs is absent or has the wrong type.
    #[error("provider response is missing field `{field}`")]
    Mapping { field: String },

    #[error("favorites storage error ({}): {message}", .path.display())]
    Storage { path: PathBuf, message: String },

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("{failed} of {total} favorite locations could not be fetched")]
    FavoritesIncomplete { failed: usize, total: usize },
}

impl WeatherError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub fn mapping(field: impl Into<String>) -> Self {
        Self::Mapping { field: field.into() }
    }

    pub fn storage(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Self::Storage { path: path.into(), message: message.to_string() }
    }

    /// Extra line printed under the error message, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Config(_) => Some(
                "Hint: export OPENWEATHER_API_KEY=<your key> or set `api_key` in the wx config file.",
            ),
            Self::Provider { status: 401, .. } => Some("Hint: check that your API key is valid and activated."),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_shows_status_and_message() {
        let err = WeatherError::Provider { status: 404, message: "city not found".into() };
        assert_eq!(err.to_string(), "provider returned 404: city not found");
    }

    #[test]
    fn mapping_error_names_field() {
        let err = WeatherError::mapping("main.temp");
        assert!(err.to_string().contains("`main.temp`"));
    }

    #[test]
    fn config_errors_carry_a_hint() {
        assert!(WeatherError::config("no key").hint().unwrap().contains("OPENWEATHER_API_KEY"));
        assert!(WeatherError::Decode("eof".into()).hint().is_none());
    }

    #[test]
    fn storage_error_includes_path() {
        let err = WeatherError::storage("/tmp/favs.json", "permission denied");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/favs.json"));
        assert!(msg.contains("permission denied"));
    }
}
