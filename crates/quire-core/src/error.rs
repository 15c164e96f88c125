//! Error types for Quire core operations.
//!
//! Library-level failures are modelled with `thiserror`; the CLI wraps them in
//! `anyhow` at its boundary. Errors come from full walks and from the files
//! the crate owns (config and usage counts). Incremental maintenance and every
//! read-side query degrade to empty results instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using QuireError
pub type Result<T> = std::result::Result<T, QuireError>;

/// Core error types for Quire operations.
#[derive(Error, Debug)]
pub enum QuireError {
    // === Index Errors ===
    /// A directory could not be listed during a full build.
    #[error("read search dir {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configured notes root does not exist
    #[error("notes root not found: {path}")]
    RootNotFound { path: PathBuf },

    /// The configured notes root exists but is not a directory
    #[error("notes root is not a directory: {path}")]
    RootNotDirectory { path: PathBuf },

    // === Configuration Errors ===
    /// Configuration file parsing or location failed
    #[error("configuration error: {reason}")]
    Config { reason: String },

    // === I/O Errors ===
    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// Usage file encoding or decoding failed
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl QuireError {
    /// Create a configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        QuireError::Config {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for QuireError {
    fn from(err: serde_json::Error) -> Self {
        QuireError::Serialization(err.to_string())
    }
}
