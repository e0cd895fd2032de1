//! Response models and formatting
//!
//! Responses are GeoJSON-like feature collections. Callers either get the
//! parsed JSON back untouched or, when formatting is requested, one flat
//! [`FormattedRecord`] per feature.

use domain::GeoLocation;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GeocodingError;
use crate::query::Query;

/// A single geocoded result as returned by the service
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Feature {
    /// Point geometry
    pub geometry: Geometry,

    /// Descriptive properties (`label`, `postalcode`, `country`, ...)
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// Feature geometry
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Geometry {
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

/// Feature properties flattened into an address record
///
/// Serializes as the original properties plus `address` and `latlng`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedRecord {
    /// Remaining feature properties
    #[serde(flatten)]
    pub properties: Map<String, Value>,

    /// Label followed by the postal code, if any
    pub address: String,

    /// Feature location
    pub latlng: GeoLocation,
}

impl FormattedRecord {
    /// Look up a property by name
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

/// Result of a search, reverse or autocomplete call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GeocodeResponse {
    /// Parsed response body, untouched
    Raw(Value),
    /// One record per returned feature
    Formatted(Vec<FormattedRecord>),
}

impl GeocodeResponse {
    /// The empty collection returned when there is nothing to look up
    #[must_use]
    pub const fn empty() -> Self {
        Self::Formatted(Vec::new())
    }

    /// Raw body, if formatting was not applied
    #[must_use]
    pub const fn as_raw(&self) -> Option<&Value> {
        match self {
            Self::Raw(value) => Some(value),
            Self::Formatted(_) => None,
        }
    }

    /// Formatted records, if formatting was applied
    #[must_use]
    pub fn as_records(&self) -> Option<&[FormattedRecord]> {
        match self {
            Self::Raw(_) => None,
            Self::Formatted(records) => Some(records),
        }
    }

    /// Features of a raw feature collection
    #[must_use]
    pub fn raw_features(&self) -> Option<&Vec<Value>> {
        self.as_raw()
            .and_then(|value| value.get("features"))
            .and_then(Value::as_array)
    }

    /// Whether the response holds no results
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Formatted(records) => records.is_empty(),
            Self::Raw(Value::Array(items)) => items.is_empty(),
            Self::Raw(_) => self.raw_features().is_none_or(Vec::is_empty),
        }
    }
}

/// A response together with the query that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    /// Parameters sent, API key masked; `None` when no request was made
    pub query: Option<Query>,
    /// Shaped response body
    pub response: GeocodeResponse,
}

impl GeocodeResult {
    /// The empty result returned when there is nothing to look up
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            query: None,
            response: GeocodeResponse::empty(),
        }
    }

    /// Pair a response with the query that was sent, masking its API key
    #[must_use]
    pub fn new(query: &Query, response: GeocodeResponse) -> Self {
        Self {
            query: Some(query.masked()),
            response,
        }
    }

    /// Whether the response holds no results
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.response.is_empty()
    }
}

/// Build the display address: label, then postal code when present
#[must_use]
pub fn address_line(properties: &Map<String, Value>) -> String {
    let label = match properties.get("label") {
        Some(Value::String(label)) => label.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    let postal_code = match properties.get("postalcode") {
        Some(Value::String(code)) if !code.is_empty() => Some(code.clone()),
        Some(Value::Number(code)) => Some(code.to_string()),
        _ => None,
    };

    match postal_code {
        Some(code) => format!("{label} {code}"),
        None => label,
    }
}

/// Flatten a feature into a record
///
/// # Errors
///
/// Returns a parse error if the coordinates are out of range.
pub fn format_feature(feature: Feature) -> Result<FormattedRecord, GeocodingError> {
    let Feature {
        geometry,
        mut properties,
    } = feature;

    let latlng = GeoLocation::from_coordinates(geometry.coordinates)
        .map_err(|e| GeocodingError::ParseError(e.to_string()))?;
    let address = address_line(&properties);

    properties.remove("address");
    properties.remove("latlng");

    Ok(FormattedRecord {
        properties,
        address,
        latlng,
    })
}

/// Shape a parsed response
///
/// Without `format` the JSON passes through unchanged. With `format`, a
/// `features` array is mapped to records; a body without one also passes
/// through unchanged.
///
/// # Errors
///
/// Returns a parse error if a feature lacks a usable geometry.
pub fn format_response(json: Value, format: bool) -> Result<GeocodeResponse, GeocodingError> {
    if !format {
        return Ok(GeocodeResponse::Raw(json));
    }

    let Value::Object(mut body) = json else {
        return Ok(GeocodeResponse::Raw(json));
    };

    match body.remove("features") {
        Some(Value::Array(features)) => features
            .into_iter()
            .map(|feature| {
                let feature: Feature = serde_json::from_value(feature)
                    .map_err(|e| GeocodingError::ParseError(format!("malformed feature: {e}")))?;
                format_feature(feature)
            })
            .collect::<Result<Vec<_>, _>>()
            .map(GeocodeResponse::Formatted),
        Some(other) => {
            body.insert("features".to_string(), other);
            Ok(GeocodeResponse::Raw(Value::Object(body)))
        },
        None => Ok(GeocodeResponse::Raw(Value::Object(body))),
    }
}
