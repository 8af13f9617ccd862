//! Error types for lexchunk.
//!
//! This module defines a unified error enum that covers every failure that
//! can cross the collaborator boundary: configuration, I/O, markup
//! extraction, batch ingestion and serialization.

use thiserror::Error;

/// Unified error type for lexchunk.
///
/// The pipeline stages themselves are total; only the code that touches the
/// outside world (files, config, sinks) returns `Result<T, AppError>`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Markup could not be turned into a usable structured document
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Batch ingestion errors (sinks, manifests, workers)
    #[error("Ingest error: {0}")]
    Ingest(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
