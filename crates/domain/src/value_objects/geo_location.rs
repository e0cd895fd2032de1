//! Geographic location value object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// A geographic location with latitude and longitude
///
/// Serializes as `{"lat": .., "lon": ..}`. Deserialization is lenient and
/// accepts the coordinate shapes geocoding callers commonly pass around:
///
/// - objects keyed `lat`/`latitude`/`y` and `lon`/`lng`/`longitude`/`x`
/// - GeoJSON points `{"type": "Point", "coordinates": [lon, lat]}`
/// - bare `[lon, lat]` coordinate arrays
/// - `"lon,lat"` strings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CoordinateInput")]
pub struct GeoLocation {
    /// Latitude in degrees (-90 to 90)
    #[serde(rename = "lat")]
    latitude: f64,
    /// Longitude in degrees (-180 to 180)
    #[serde(rename = "lon")]
    longitude: f64,
}

impl GeoLocation {
    /// Create a new location with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if latitude is not in
    /// [-90, 90] or longitude is not in [-180, 180]
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::invalid_coordinates(latitude, longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Create a location without validation (for trusted sources)
    ///
    /// Caller must ensure latitude is in [-90, 90] and longitude in [-180, 180]
    #[must_use]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a location from a GeoJSON coordinate pair (`[lon, lat]`)
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if the pair is out of range
    pub fn from_coordinates(coordinates: [f64; 2]) -> Result<Self, DomainError> {
        let [longitude, latitude] = coordinates;
        Self::new(latitude, longitude)
    }

    /// The GeoJSON coordinate pair for this location (`[lon, lat]`)
    #[must_use]
    pub const fn to_coordinates(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Parses `"lon,lat"`, the order used by GeoJSON coordinates
impl FromStr for GeoLocation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',').map(str::trim);
        let (Some(lon), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(DomainError::MalformedCoordinates(format!(
                "expected \"lon,lat\", got {s:?}"
            )));
        };

        let parse = |value: &str| {
            value
                .parse::<f64>()
                .map_err(|e| DomainError::MalformedCoordinates(format!("{value:?}: {e}")))
        };

        Self::new(parse(lat)?, parse(lon)?)
    }
}

/// Every coordinate shape accepted when deserializing a [`GeoLocation`]
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CoordinateInput {
    Named {
        #[serde(alias = "latitude", alias = "y")]
        lat: f64,
        #[serde(alias = "lng", alias = "longitude", alias = "x")]
        lon: f64,
    },
    Point {
        coordinates: [f64; 2],
    },
    Pair([f64; 2]),
    Text(String),
}

impl TryFrom<CoordinateInput> for GeoLocation {
    type Error = DomainError;

    fn try_from(input: CoordinateInput) -> Result<Self, Self::Error> {
        match input {
            CoordinateInput::Named { lat, lon } => Self::new(lat, lon),
            CoordinateInput::Point { coordinates } | CoordinateInput::Pair(coordinates) => {
                Self::from_coordinates(coordinates)
            },
            CoordinateInput::Text(text) => text.parse(),
        }
    }
}
