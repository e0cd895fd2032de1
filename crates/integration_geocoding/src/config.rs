//! Geocoding service configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for the geocoding service client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Base URL of the search API; operations are appended as path segments
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Client-wide request timeout in seconds (none by default; per-call
    /// timeouts go through request options)
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Data sources queried when a call does not name its own
    #[serde(default = "default_sources")]
    pub default_sources: String,

    /// Result count for search when a call does not set one
    #[serde(default = "default_size")]
    pub default_size: u32,
}

fn default_base_url() -> String {
    "https://search.mapzen.com/v1".to_string()
}

fn default_user_agent() -> String {
    format!("integration_geocoding/{}", env!("CARGO_PKG_VERSION"))
}

pub(crate) fn default_sources() -> String {
    "gn,oa,osm,wof".to_string()
}

const fn default_size() -> u32 {
    10
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            user_agent: default_user_agent(),
            default_sources: default_sources(),
            default_size: default_size(),
        }
    }
}

impl GeocodingConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: Some(5),
            ..Default::default()
        }
    }

    /// Create a configuration pointing at another base URL
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Client-wide timeout, if configured
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        Url::parse(&self.base_url).map_err(|e| format!("base_url is not a valid URL: {e}"))?;

        if self.timeout_secs == Some(0) {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.default_size == 0 {
            return Err("default_size must be greater than 0".to_string());
        }

        Ok(())
    }
}

/// Configuration for an autocomplete session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutocompleteConfig {
    /// Quiet period before a query is sent, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Queries with fewer characters are dropped
    #[serde(default = "default_min_text_length")]
    pub min_text_length: usize,

    /// Deliver formatted records instead of the raw response
    #[serde(default)]
    pub format_results: bool,

    /// Upper bound on cached responses (unbounded when unset)
    #[serde(default)]
    pub cache_max_entries: Option<u64>,
}

const fn default_debounce_ms() -> u64 {
    333
}

const fn default_min_text_length() -> usize {
    3
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_text_length: default_min_text_length(),
            format_results: false,
            cache_max_entries: None,
        }
    }
}

impl AutocompleteConfig {
    /// Debounce interval as a duration
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.cache_max_entries == Some(0) {
            return Err("cache_max_entries must be greater than 0 when set".to_string());
        }

        Ok(())
    }
}
