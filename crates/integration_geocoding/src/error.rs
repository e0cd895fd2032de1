//! Geocoding error types

use thiserror::Error;

/// Errors that can occur during geocoding operations
#[derive(Debug, Clone, Error)]
pub enum GeocodingError {
    /// Connection to the geocoding service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the geocoding service timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Request could not be built (e.g. an invalid header)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from the geocoding service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl GeocodingError {
    /// Returns true if the error comes from the network layer
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::ConnectionFailed(_) | Self::Timeout(_))
    }

    /// Returns true if this error is retryable
    ///
    /// The client itself never retries; callers may.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.is_network()
    }
}

impl From<reqwest::Error> for GeocodingError {
    fn from(e: reqwest::Error) -> Self {
        // The request URL carries the API key.
        let e = e.without_url();
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_builder() {
            Self::RequestFailed(e.to_string())
        } else {
            Self::ConnectionFailed(e.to_string())
        }
    }
}

impl From<serde_json::Error> for GeocodingError {
    fn from(e: serde_json::Error) -> Self {
        Self::ParseError(e.to_string())
    }
}
