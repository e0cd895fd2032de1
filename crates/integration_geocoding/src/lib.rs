//! Geocoding integration
//!
//! Client for a [Pelias](https://github.com/pelias/pelias)-style search API such as
//! Mapzen Search: forward search, reverse geocoding and type-ahead autocomplete.
//!
//! # Architecture
//!
//! The crate follows the client-trait pattern used by the other integration crates.
//! [`Geocoder`] defines the three operations and is implemented by [`GeocodingClient`].
//! Requests go through an [`HttpTransport`], with [`ReqwestTransport`] used in
//! production. [`QueryBuilder`] turns options into query parameters and
//! [`format_response`] optionally flattens features into [`FormattedRecord`]s.
//!
//! [`AutocompleteSession`] wraps the client for interactive input: it debounces
//! keystrokes, caches responses by query and only delivers the latest result.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_geocoding::{Geocoder, GeocodingClient, GeocodingConfig, SearchOptions};
//!
//! let client = GeocodingClient::new(GeocodingConfig::default())?;
//!
//! let results = client
//!     .search("search-key", "123 main st", &SearchOptions::default().formatted())
//!     .await?;
//!
//! for record in results.response.as_records().unwrap_or_default() {
//!     println!("{} ({})", record.address, record.latlng);
//! }
//! ```

mod autocomplete;
mod client;
mod config;
mod error;
mod format;
mod options;
mod query;
mod transport;

pub use autocomplete::{AutocompleteSession, ResultsHandler, SessionState};
pub use client::{Geocoder, GeocodingClient, Operation};
pub use config::{AutocompleteConfig, GeocodingConfig};
pub use domain::{Boundary, BoundaryCircle, BoundaryRect, GeoLocation};
pub use error::GeocodingError;
pub use format::{
    Feature, FormattedRecord, GeocodeResponse, GeocodeResult, Geometry, address_line,
    format_feature, format_response,
};
pub use options::{AutocompleteOptions, AutocompleteQuery, ReverseOptions, SearchOptions};
pub use query::{API_KEY_PARAM, CircleFilter, Query, QueryBuilder, QueryValue};
pub use transport::{HttpTransport, ReqwestTransport, RequestOptions};
