//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Latitude or longitude outside the valid range
    #[error(
        "Invalid coordinates ({latitude}, {longitude}): latitude must be -90 to 90, longitude must be -180 to 180"
    )]
    InvalidCoordinates {
        /// The rejected latitude
        latitude: f64,
        /// The rejected longitude
        longitude: f64,
    },

    /// Coordinate input that could not be interpreted
    #[error("Malformed coordinate input: {0}")]
    MalformedCoordinates(String),

    /// Boundary filter that cannot describe a region
    #[error("Invalid boundary: {0}")]
    InvalidBoundary(String),
}

impl DomainError {
    /// Create an invalid coordinates error
    pub const fn invalid_coordinates(latitude: f64, longitude: f64) -> Self {
        Self::InvalidCoordinates {
            latitude,
            longitude,
        }
    }
}
