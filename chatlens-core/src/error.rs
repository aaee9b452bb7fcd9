//! Error types for chatlens-core

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the chatlens-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A message timestamp matched neither the primary nor the fallback format
    #[error("unrecognized timestamp format: {raw:?} (expected DD.MM.YYYY HH:MM:SS)")]
    TimestampFormat { raw: String },

    /// Export directory is missing or cannot be listed
    #[error("cannot read export directory {}: {message}", path.display())]
    SourceDir { path: PathBuf, message: String },

    /// Invalid file discovery pattern
    #[error("invalid file pattern: {0}")]
    Pattern(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for chatlens-core
pub type Result<T> = std::result::Result<T, Error>;
