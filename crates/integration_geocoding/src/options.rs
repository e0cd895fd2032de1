//! Per-call options for search, reverse and autocomplete

use domain::{Boundary, GeoLocation};

use crate::config::GeocodingConfig;
use crate::query::{CircleFilter, Query, QueryBuilder};
use crate::transport::RequestOptions;

/// Options for a forward search
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Country, rectangle and circle filters
    pub boundary: Option<Boundary>,
    /// Point to bias ranking toward
    pub focus_point: Option<GeoLocation>,
    /// Return formatted records instead of the raw response
    pub format: bool,
    /// Maximum number of results (configured default when unset)
    pub size: Option<u32>,
    /// Data sources (configured default when unset, omitted when empty)
    pub sources: Option<String>,
    /// Full endpoint URL overriding the configured one
    pub url: Option<String>,
    /// Headers and timeout for this call
    pub request: RequestOptions,
}

impl SearchOptions {
    /// Restrict results to a boundary
    #[must_use]
    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = Some(boundary);
        self
    }

    /// Bias results toward a point
    #[must_use]
    pub const fn with_focus_point(mut self, point: GeoLocation) -> Self {
        self.focus_point = Some(point);
        self
    }

    /// Request formatted records
    #[must_use]
    pub const fn formatted(mut self) -> Self {
        self.format = true;
        self
    }

    /// Set the maximum number of results
    #[must_use]
    pub const fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the data sources
    #[must_use]
    pub fn with_sources(mut self, sources: impl Into<String>) -> Self {
        self.sources = Some(sources.into());
        self
    }

    /// Override the endpoint URL
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set headers and timeout
    #[must_use]
    pub fn with_request(mut self, request: RequestOptions) -> Self {
        self.request = request;
        self
    }

    pub(crate) fn to_query(&self, api_key: &str, text: &str, config: &GeocodingConfig) -> Query {
        QueryBuilder::new(api_key)
            .size(self.size.unwrap_or(config.default_size))
            .text(text)
            .sources(self.sources.as_deref().unwrap_or(&config.default_sources))
            .focus_point(self.focus_point.as_ref())
            .boundary(self.boundary.as_ref(), CircleFilter::Include)
            .build()
    }
}

/// Options for a reverse geocode
#[derive(Debug, Clone, Default)]
pub struct ReverseOptions {
    /// Return formatted records instead of the raw response
    pub format: bool,
    /// Full endpoint URL overriding the configured one
    pub url: Option<String>,
    /// Headers and timeout for this call
    pub request: RequestOptions,
}

impl ReverseOptions {
    /// Request formatted records
    #[must_use]
    pub const fn formatted(mut self) -> Self {
        self.format = true;
        self
    }

    /// Override the endpoint URL
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set headers and timeout
    #[must_use]
    pub fn with_request(mut self, request: RequestOptions) -> Self {
        self.request = request;
        self
    }

    pub(crate) fn to_query(api_key: &str, point: &GeoLocation) -> Query {
        QueryBuilder::new(api_key).point(point).build()
    }
}

/// Options for a one-off autocomplete call
///
/// Circle boundaries are not supported by the endpoint and are dropped.
#[derive(Debug, Clone, Default)]
pub struct AutocompleteOptions {
    /// Country and rectangle filters
    pub boundary: Option<Boundary>,
    /// Point to bias ranking toward
    pub focus_point: Option<GeoLocation>,
    /// Return formatted records instead of the raw response
    pub format: bool,
    /// Comma-separated layer types
    pub layers: Option<String>,
    /// Data sources (configured default when unset, omitted when empty)
    pub sources: Option<String>,
    /// Full endpoint URL overriding the configured one
    pub url: Option<String>,
    /// Headers and timeout for this call
    pub request: RequestOptions,
}

impl AutocompleteOptions {
    /// Restrict results to a boundary
    #[must_use]
    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = Some(boundary);
        self
    }

    /// Bias results toward a point
    #[must_use]
    pub const fn with_focus_point(mut self, point: GeoLocation) -> Self {
        self.focus_point = Some(point);
        self
    }

    /// Request formatted records
    #[must_use]
    pub const fn formatted(mut self) -> Self {
        self.format = true;
        self
    }

    /// Set the layer types
    #[must_use]
    pub fn with_layers(mut self, layers: impl Into<String>) -> Self {
        self.layers = Some(layers.into());
        self
    }

    /// Set the data sources
    #[must_use]
    pub fn with_sources(mut self, sources: impl Into<String>) -> Self {
        self.sources = Some(sources.into());
        self
    }

    /// Override the endpoint URL
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set headers and timeout
    #[must_use]
    pub fn with_request(mut self, request: RequestOptions) -> Self {
        self.request = request;
        self
    }

    pub(crate) fn to_query(&self, api_key: &str, text: &str, config: &GeocodingConfig) -> Query {
        autocomplete_query(
            api_key,
            text,
            self.sources.as_deref().unwrap_or(&config.default_sources),
            self.layers.as_deref(),
            self.focus_point.as_ref(),
            self.boundary.as_ref(),
        )
    }
}

/// Input for [`AutocompleteSession::query`](crate::AutocompleteSession::query)
#[derive(Debug, Clone, Default)]
pub struct AutocompleteQuery {
    /// Text typed so far
    pub text: String,
    /// Country and rectangle filters
    pub boundary: Option<Boundary>,
    /// Point to bias ranking toward
    pub focus_point: Option<GeoLocation>,
    /// Comma-separated layer types
    pub layers: Option<String>,
    /// Data sources (configured default when unset, omitted when empty)
    pub sources: Option<String>,
}

impl AutocompleteQuery {
    /// Query for `text` without filters
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Restrict results to a boundary
    #[must_use]
    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = Some(boundary);
        self
    }

    /// Bias results toward a point
    #[must_use]
    pub const fn with_focus_point(mut self, point: GeoLocation) -> Self {
        self.focus_point = Some(point);
        self
    }

    /// Set the layer types
    #[must_use]
    pub fn with_layers(mut self, layers: impl Into<String>) -> Self {
        self.layers = Some(layers.into());
        self
    }

    /// Set the data sources
    #[must_use]
    pub fn with_sources(mut self, sources: impl Into<String>) -> Self {
        self.sources = Some(sources.into());
        self
    }

    pub(crate) fn to_query(&self, api_key: &str, config: &GeocodingConfig) -> Query {
        autocomplete_query(
            api_key,
            &self.text,
            self.sources.as_deref().unwrap_or(&config.default_sources),
            self.layers.as_deref(),
            self.focus_point.as_ref(),
            self.boundary.as_ref(),
        )
    }
}

fn autocomplete_query(
    api_key: &str,
    text: &str,
    sources: &str,
    layers: Option<&str>,
    focus_point: Option<&GeoLocation>,
    boundary: Option<&Boundary>,
) -> Query {
    QueryBuilder::new(api_key)
        .text(text)
        .sources(sources)
        .layers(layers)
        .focus_point(focus_point)
        .boundary(boundary, CircleFilter::Ignore)
        .build()
}
