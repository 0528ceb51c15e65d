//! Error types for series parsing and calendar arithmetic.

use thiserror::Error;

/// Errors raised while decoding series records or calendar values.
///
/// Validation failures of a whole batch are not errors; they are reported as
/// diagnostics on a [`crate::ValidationOutcome`].
#[derive(Error, Debug)]
pub enum SeriesError {
    #[error(transparent)]
    Core(#[from] cm_core::CoreError),

    #[error("Invalid date: month={month} day={day} hour={hour}")]
    InvalidDate { month: u32, day: u32, hour: u32 },

    #[error("Hour of year out of range: {hoy} (expected 1..=8760)")]
    InvalidHour { hoy: usize },

    #[error("Could not parse {field} from '{value}'")]
    Parse { field: &'static str, value: String },

    #[error("Series record is empty")]
    EmptyRecord,

    #[error("Non-numeric sample at position {index}: '{value}'")]
    NonNumeric { index: usize, value: String },

    #[error("Series length mismatch for {what}: expected {expected}, got {actual}")]
    Length {
        what: String,
        expected: usize,
        actual: usize,
    },
}

pub type SeriesResult<T> = Result<T, SeriesError>;
