//! Error types for topograph-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// A raw record could not be normalized
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// The caller required at least one record
    #[error("Empty dataset")]
    EmptyDataset,

    /// Neither the requested locale nor the fallback has a name table
    #[error("No name table for locale: {0}")]
    LocaleNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
