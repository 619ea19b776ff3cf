//! Error types for the coin market client

use thiserror::Error;

/// Errors that can occur when fetching the market list
///
/// The `Display` output doubles as the message shown to the user.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request URL could not be built; no network call was made
    #[error("Invalid API URL: {0}")]
    InvalidRequest(String),

    /// Transport failure, no HTTP response received
    #[error("Error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-200 HTTP response
    #[error("Failed to fetch data. HTTP Status Code: {status}")]
    Http { status: u16 },

    /// Response body did not match the expected shape
    #[error("Error: failed to decode market data: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Creates an InvalidRequest error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Creates an Http error from a status code
    pub fn http(status: u16) -> Self {
        Self::Http { status }
    }

    /// Status code for HTTP failures
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status } => Some(*status),
            FetchError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Errors raised by the line graph engine
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    /// Nearest-point lookup over an empty point sequence
    #[error("graph has no points")]
    EmptyInput,
}

/// Errors raised while reading or writing favorites
#[derive(Debug, Error)]
pub enum FavoritesError {
    /// Underlying storage could not be read or written
    #[error("Preference store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value could not be (de)serialized
    #[error("Preference store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while loading configuration overrides
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An override was present but unusable
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

impl ConfigError {
    /// Creates an InvalidValue error
    pub fn invalid_value(key: &str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.into(),
        }
    }
}
