// src/error.rs

use thiserror::Error;

/// Errors surfaced before a run starts, or while reading and writing run data.
///
/// Numerical degeneracy is deliberately absent: a run whose state hits zero in
/// a divisor still completes and reports non-finite values in its trajectory.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("parameter '{name}' has non-numeric value '{value}'")]
    InvalidParameter { name: String, value: String },

    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ChainResult<T> = Result<T, ChainError>;
