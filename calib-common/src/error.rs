//! Common error types for calibration ingest

use thiserror::Error;

/// Common result type for calibration ingest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the ingest crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required header keyword or packed-identifier field is absent.
    /// Callers that treat a field as optional must check existence first.
    #[error("Missing keyword: {0}")]
    MissingKeyword(String),

    /// Calibration-type label matched no known kind. Unrecoverable: this
    /// is a classification defect upstream, not a data condition.
    #[error("Invalid calibType '{0}'")]
    InvalidCalibType(String),

    /// Invalid input or malformed value
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
