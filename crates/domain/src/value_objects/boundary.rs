//! Boundary filters narrowing geocoding results to a region

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::GeoLocation;

/// Geographic constraint for search and autocomplete
///
/// The three filters are independent; any combination may be set and each
/// one is applied additively to the outgoing query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    /// ISO country code (e.g. "USA" or "US")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Rectangular bounding box
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<BoundaryRect>,

    /// Circle around a center point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circle: Option<BoundaryCircle>,
}

impl Boundary {
    /// Boundary restricted to a single country
    #[must_use]
    pub fn country(code: impl Into<String>) -> Self {
        Self {
            country: Some(code.into()),
            ..Self::default()
        }
    }

    /// Add a country restriction
    #[must_use]
    pub fn with_country(mut self, code: impl Into<String>) -> Self {
        self.country = Some(code.into());
        self
    }

    /// Add a bounding box
    #[must_use]
    pub const fn with_rect(mut self, rect: BoundaryRect) -> Self {
        self.rect = Some(rect);
        self
    }

    /// Add a bounding circle
    #[must_use]
    pub const fn with_circle(mut self, circle: BoundaryCircle) -> Self {
        self.circle = Some(circle);
        self
    }

    /// Whether no filter is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.country.is_none() && self.rect.is_none() && self.circle.is_none()
    }
}

/// Rectangular bounding box in degrees
///
/// Deserializes from both `min_lat` and `minLat` style field names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RectInput")]
pub struct BoundaryRect {
    min_lat: f64,
    min_lon: f64,
    max_lat: f64,
    max_lon: f64,
}

impl BoundaryRect {
    /// Create a bounding box
    ///
    /// # Errors
    ///
    /// Returns an error if a bound is out of range or a minimum exceeds its
    /// maximum.
    pub fn new(
        min_lat: f64,
        min_lon: f64,
        max_lat: f64,
        max_lon: f64,
    ) -> Result<Self, DomainError> {
        GeoLocation::new(min_lat, min_lon)?;
        GeoLocation::new(max_lat, max_lon)?;

        if min_lat > max_lat || min_lon > max_lon {
            return Err(DomainError::InvalidBoundary(format!(
                "minimum ({min_lat}, {min_lon}) exceeds maximum ({max_lat}, {max_lon})"
            )));
        }

        Ok(Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        })
    }

    /// Southern bound
    #[must_use]
    pub const fn min_lat(&self) -> f64 {
        self.min_lat
    }

    /// Western bound
    #[must_use]
    pub const fn min_lon(&self) -> f64 {
        self.min_lon
    }

    /// Northern bound
    #[must_use]
    pub const fn max_lat(&self) -> f64 {
        self.max_lat
    }

    /// Eastern bound
    #[must_use]
    pub const fn max_lon(&self) -> f64 {
        self.max_lon
    }
}

#[derive(Debug, Deserialize)]
struct RectInput {
    #[serde(alias = "minLat")]
    min_lat: f64,
    #[serde(alias = "minLon")]
    min_lon: f64,
    #[serde(alias = "maxLat")]
    max_lat: f64,
    #[serde(alias = "maxLon")]
    max_lon: f64,
}

impl TryFrom<RectInput> for BoundaryRect {
    type Error = DomainError;

    fn try_from(input: RectInput) -> Result<Self, Self::Error> {
        Self::new(input.min_lat, input.min_lon, input.max_lat, input.max_lon)
    }
}

/// Circle around a center point, radius in kilometers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CircleInput")]
pub struct BoundaryCircle {
    center: GeoLocation,
    radius: f64,
}

impl BoundaryCircle {
    /// Create a bounding circle
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not a positive finite number.
    pub fn new(center: GeoLocation, radius: f64) -> Result<Self, DomainError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(DomainError::InvalidBoundary(format!(
                "circle radius must be positive, got {radius}"
            )));
        }
        Ok(Self { center, radius })
    }

    /// Center of the circle
    #[must_use]
    pub const fn center(&self) -> GeoLocation {
        self.center
    }

    /// Radius in kilometers
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }
}

#[derive(Debug, Deserialize)]
struct CircleInput {
    #[serde(alias = "centerPoint", alias = "center_point")]
    center: GeoLocation,
    radius: f64,
}

impl TryFrom<CircleInput> for BoundaryCircle {
    type Error = DomainError;

    fn try_from(input: CircleInput) -> Result<Self, Self::Error> {
        Self::new(input.center, input.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_only_boundary() {
        let boundary = Boundary::country("USA");
        assert_eq!(boundary.country.as_deref(), Some("USA"));
        assert!(boundary.rect.is_none());
        assert!(boundary.circle.is_none());
        assert!(!boundary.is_empty());
        assert!(Boundary::default().is_empty());
    }

    #[test]
    fn test_builder_combines_filters() {
        let rect = BoundaryRect::new(38.0, -78.0, 39.0, -76.0).expect("valid rect");
        let circle =
            BoundaryCircle::new(GeoLocation::new_unchecked(38.9, -77.0), 5.0).expect("valid");
        let boundary = Boundary::default()
            .with_country("USA")
            .with_rect(rect)
            .with_circle(circle);

        assert_eq!(boundary.country.as_deref(), Some("USA"));
        assert_eq!(boundary.rect, Some(rect));
        assert_eq!(boundary.circle, Some(circle));
    }

    #[test]
    fn test_rect_rejects_inverted_bounds() {
        let result = BoundaryRect::new(39.0, -78.0, 38.0, -76.0);
        assert!(matches!(result, Err(DomainError::InvalidBoundary(_))));
    }

    #[test]
    fn test_rect_rejects_out_of_range() {
        let result = BoundaryRect::new(-95.0, -78.0, 38.0, -76.0);
        assert!(matches!(result, Err(DomainError::InvalidCoordinates { .. })));
    }

    #[test]
    fn test_rect_accepts_both_naming_conventions() {
        let camel: BoundaryRect = serde_json::from_str(
            r#"{"minLat": 38.0, "minLon": -78.0, "maxLat": 39.0, "maxLon": -76.0}"#,
        )
        .expect("camelCase");
        let snake: BoundaryRect = serde_json::from_str(
            r#"{"min_lat": 38.0, "min_lon": -78.0, "max_lat": 39.0, "max_lon": -76.0}"#,
        )
        .expect("snake_case");

        assert_eq!(camel, snake);
        assert!((camel.min_lat() - 38.0).abs() < f64::EPSILON);
        assert!((camel.max_lon() - -76.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_circle_rejects_non_positive_radius() {
        let center = GeoLocation::new_unchecked(0.0, 0.0);
        assert!(BoundaryCircle::new(center, 0.0).is_err());
        assert!(BoundaryCircle::new(center, -1.0).is_err());
        assert!(BoundaryCircle::new(center, f64::NAN).is_err());
    }

    #[test]
    fn test_circle_accepts_center_point_alias() {
        let circle: BoundaryCircle = serde_json::from_str(
            r#"{"centerPoint": {"lat": 38.9, "lng": -77.0}, "radius": 10}"#,
        )
        .expect("valid circle");
        assert!((circle.center().latitude() - 38.9).abs() < f64::EPSILON);
        assert!((circle.radius() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_boundary_deserializes_partial_input() {
        let boundary: Boundary =
            serde_json::from_str(r#"{"country": "USA"}"#).expect("country only");
        assert_eq!(boundary, Boundary::country("USA"));
    }
}
