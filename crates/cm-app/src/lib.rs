//! Shared application service layer for comfortmap.
//!
//! Loads a project and its input bundle, maps every hour of the analysis
//! period, aggregates the hourly comfort results and persists them in the
//! run store. Front ends drive it through [`ensure_run`] and
//! [`check_project`].

pub mod error;
pub mod progress;
pub mod project_service;
pub mod query;
pub mod run_service;

pub use error::{AppError, AppResult};
pub use progress::{HourProgress, ProgressSink, RunProgressEvent, RunStage};
pub use project_service::{CheckReport, check_project, load_inputs, load_project};
pub use query::{FileReport, inspect_file};
pub use run_service::{
    RunMode, RunOptions, RunRequest, RunResponse, ensure_run, ensure_run_with_progress, list_runs,
};
