//! Error types for the cm-app service layer.

use std::path::PathBuf;

/// Unified error for the command-line front end.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Failed to read input bundle: {path}: {message}")]
    BundleRead { path: PathBuf, message: String },

    #[error(transparent)]
    Map(#[from] cm_map::MapError),

    #[error("Missing {what}")]
    Missing { what: String },

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<cm_project::ProjectError> for AppError {
    fn from(err: cm_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<cm_results::ResultsError> for AppError {
    fn from(err: cm_results::ResultsError) -> Self {
        match err {
            cm_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}

impl From<cm_series::SeriesError> for AppError {
    fn from(err: cm_series::SeriesError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}
