//! Domain layer for the geocoding client
//!
//! Contains the geographic value objects (coordinates and boundary filters)
//! shared by the service integration, plus domain errors.
//! This layer has no I/O and defines the ubiquitous language.

pub mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::*;
