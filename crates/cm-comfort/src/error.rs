use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComfortError {
    #[error(transparent)]
    Core(#[from] cm_core::CoreError),

    #[error("Missing input for comfort evaluation: {what}")]
    MissingInput { what: &'static str },

    #[error("Invalid comfort parameter: {what}")]
    InvalidParam { what: String },

    #[error("Clothing temperature iteration did not converge after {iterations} steps")]
    NoConvergence { iterations: usize },
}

pub type ComfortResult<T> = Result<T, ComfortError>;
