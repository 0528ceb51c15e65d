//! cm-results: result matrices, temporal aggregation and run storage.

pub mod aggregate;
pub mod csv;
pub mod hash;
pub mod matrix;
pub mod store;
pub mod types;

pub use aggregate::{AggregateResult, AggregationInputs, Metric, PointCounters, TemporalAggregator};
pub use hash::{compute_run_id, digest_bytes};
pub use matrix::{ResultMatrix, Summary, hours_label, parse_header};
pub use store::{ResultStore, is_aggregate_label};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Series(#[from] cm_series::SeriesError),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },

    #[error("Malformed result file at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Matrix shape mismatch: {what}")]
    Shape { what: String },
}
