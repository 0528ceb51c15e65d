use cm_series::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error(
        "Input validation failed with {} diagnostic(s): {}",
        diagnostics.len(),
        join(diagnostics)
    )]
    Validation { diagnostics: Vec<Diagnostic> },

    #[error("No matching series for {what}")]
    Match { what: String },

    #[error("Invalid input: {what}")]
    InvalidInput { what: String },

    #[error("Run cancelled at hour {at_hour}")]
    Cancelled { at_hour: usize },

    #[error(transparent)]
    Geometry(#[from] cm_geometry::GeometryError),

    #[error(transparent)]
    Comfort(#[from] cm_comfort::ComfortError),

    #[error(transparent)]
    Series(#[from] cm_series::SeriesError),
}

fn join(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type MapResult<T> = Result<T, MapError>;
