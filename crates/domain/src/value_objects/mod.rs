//! Value Objects - Immutable, identity-less domain primitives

mod boundary;
mod geo_location;

pub use boundary::{Boundary, BoundaryCircle, BoundaryRect};
pub use geo_location::GeoLocation;
