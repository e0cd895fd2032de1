//! Geocoding client
//!
//! Forward search, reverse geocoding and one-off autocomplete against a
//! Pelias-style search API (`{base_url}/search`, `/reverse`, `/autocomplete`).

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use domain::GeoLocation;
use tracing::{debug, instrument};

use crate::config::GeocodingConfig;
use crate::error::GeocodingError;
use crate::format::{GeocodeResult, format_response};
use crate::options::{AutocompleteOptions, ReverseOptions, SearchOptions};
use crate::query::Query;
use crate::transport::{self, HttpTransport, ReqwestTransport, RequestOptions};

/// Endpoint of the search API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Forward geocoding
    Search,
    /// Reverse geocoding
    Reverse,
    /// Type-ahead search
    Autocomplete,
}

impl Operation {
    /// Path segment appended to the base URL
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Reverse => "reverse",
            Self::Autocomplete => "autocomplete",
        }
    }
}

/// Trait for geocoding clients
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve free text to matching features
    ///
    /// Empty text yields an empty collection without a request.
    async fn search(
        &self,
        api_key: &str,
        text: &str,
        options: &SearchOptions,
    ) -> Result<GeocodeResult, GeocodingError>;

    /// Resolve a point to the nearest features
    async fn reverse(
        &self,
        api_key: &str,
        point: &GeoLocation,
        options: &ReverseOptions,
    ) -> Result<GeocodeResult, GeocodingError>;

    /// Complete partially typed text
    ///
    /// Empty text yields an empty collection without a request.
    async fn autocomplete(
        &self,
        api_key: &str,
        text: &str,
        options: &AutocompleteOptions,
    ) -> Result<GeocodeResult, GeocodingError>;
}

/// Client for the search API
#[derive(Clone)]
pub struct GeocodingClient {
    transport: Arc<dyn HttpTransport>,
    config: GeocodingConfig,
}

impl fmt::Debug for GeocodingClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeocodingClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GeocodingClient {
    /// Create a client using `reqwest` as transport
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: GeocodingConfig) -> Result<Self, GeocodingError> {
        config
            .validate()
            .map_err(GeocodingError::ConfigurationError)?;
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self {
            transport: Arc::new(transport),
            config,
        })
    }

    /// Create a client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, GeocodingError> {
        Self::new(GeocodingConfig::default())
    }

    /// Create a client on top of a caller-supplied transport
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_transport(
        config: GeocodingConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, GeocodingError> {
        config
            .validate()
            .map_err(GeocodingError::ConfigurationError)?;
        Ok(Self { transport, config })
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &GeocodingConfig {
        &self.config
    }

    /// Default endpoint URL for an operation
    #[must_use]
    pub fn endpoint(&self, operation: Operation) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            operation.path()
        )
    }

    fn resolve_endpoint(&self, operation: Operation, url: Option<&str>) -> String {
        url.map_or_else(|| self.endpoint(operation), str::to_string)
    }

    /// Run a built query and shape the response, echoing the masked query
    pub(crate) async fn execute(
        &self,
        endpoint: &str,
        query: &Query,
        request: &RequestOptions,
        format: bool,
    ) -> Result<GeocodeResult, GeocodingError> {
        let json = transport::run(self.transport.as_ref(), endpoint, query, request).await?;
        let response = format_response(json, format)?;
        Ok(GeocodeResult::new(query, response))
    }
}

#[async_trait]
impl Geocoder for GeocodingClient {
    #[instrument(skip(self, api_key, options), fields(format = options.format))]
    async fn search(
        &self,
        api_key: &str,
        text: &str,
        options: &SearchOptions,
    ) -> Result<GeocodeResult, GeocodingError> {
        if text.is_empty() {
            debug!("Empty search text, skipping request");
            return Ok(GeocodeResult::empty());
        }

        let query = options.to_query(api_key, text, &self.config);
        let endpoint = self.resolve_endpoint(Operation::Search, options.url.as_deref());
        let response = self
            .execute(&endpoint, &query, &options.request, options.format)
            .await?;

        debug!(empty = response.is_empty(), "Search completed");
        Ok(response)
    }

    #[instrument(skip(self, api_key, point, options), fields(point = %point))]
    async fn reverse(
        &self,
        api_key: &str,
        point: &GeoLocation,
        options: &ReverseOptions,
    ) -> Result<GeocodeResult, GeocodingError> {
        let query = ReverseOptions::to_query(api_key, point);
        let endpoint = self.resolve_endpoint(Operation::Reverse, options.url.as_deref());
        self.execute(&endpoint, &query, &options.request, options.format)
            .await
    }

    #[instrument(skip(self, api_key, options), fields(format = options.format))]
    async fn autocomplete(
        &self,
        api_key: &str,
        text: &str,
        options: &AutocompleteOptions,
    ) -> Result<GeocodeResult, GeocodingError> {
        if text.is_empty() {
            debug!("Empty autocomplete text, skipping request");
            return Ok(GeocodeResult::empty());
        }

        let query = options.to_query(api_key, text, &self.config);
        let endpoint = self.resolve_endpoint(Operation::Autocomplete, options.url.as_deref());
        self.execute(&endpoint, &query, &options.request, options.format)
            .await
    }
}
