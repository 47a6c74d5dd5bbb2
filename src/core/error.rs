//! Error types for the regularization sweep

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Class not present in dataset: {0}")]
    MissingClass(String),

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error(
        "Solver did not converge within {iterations} iterations (gradient norm {gradient_norm:.3e})"
    )]
    NotConverged {
        iterations: usize,
        gradient_norm: f64,
    },

    #[error("Hessian is not positive definite")]
    SingularSystem,

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Plotting error: {0}")]
    PlotError(String),
}

pub type Result<T> = std::result::Result<T, SweepError>;
