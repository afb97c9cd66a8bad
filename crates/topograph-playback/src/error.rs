//! Error types for topograph-playback

use thiserror::Error;

/// Playback error type
///
/// Cursor operations never fail; only configuration loading does.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be parsed
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, Error>;
