//! Geometry error types.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error(transparent)]
    Core(#[from] cm_core::CoreError),

    #[error(
        "Zone '{zone}' has a blocked-vector list of length {len}; expected 145, 577, 1297 or 2305"
    )]
    UnsupportedResolution { zone: String, len: usize },

    #[error("Zone '{zone}' point {point}: {what} has length {actual}, expected {expected}")]
    LengthMismatch {
        zone: String,
        point: usize,
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate zone name: {name}")]
    DuplicateZone { name: String },

    #[error("Only the last zone may be the outdoor zone (found '{name}')")]
    MisplacedOutdoorZone { name: String },

    #[error("Zone '{zone}' point {point}: view factors sum to {sum} (expected 1)")]
    NotNormalized { zone: String, point: usize, sum: f64 },
}

pub type GeometryResult<T> = Result<T, GeometryError>;
