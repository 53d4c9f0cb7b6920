//! Report formatting error types.

use thiserror::Error;

/// Why a prediction series could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("forecaster returned no predictions")]
    Empty,

    #[error("forecaster returned {actual} predictions, expected {expected}")]
    LengthMismatch { expected: u64, actual: usize },
}

pub type ReportResult<T> = Result<T, ReportError>;
