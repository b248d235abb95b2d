//! Error types for vidfetch
//!
//! Errors stay rich inside the crate (which file, which tool, which key) and are
//! flattened to a single free-text message at the orchestrator boundary, where
//! every failure becomes one [`Event::Error`](crate::Event::Error) and a `false`
//! outcome.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for vidfetch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for vidfetch
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "ytdlp_path")
        key: Option<String>,
    },

    /// Output directory could not be created or is not a directory
    #[error("cannot prepare output directory {}: {source}", path.display())]
    Filesystem {
        /// Directory that was being created
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The engine ran but reported a failure (network, format, post-processing...)
    #[error("{0}")]
    Engine(String),

    /// External tool could not be executed at all
    #[error("external tool error: {0}")]
    ExternalTool(String),

    /// Operation not supported (missing binary, not implemented, etc.)
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Request rejected before dispatch (empty or malformed URL)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A download is already in flight on this worker
    #[error("download already in progress")]
    Busy,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Machine-readable error code, stable across releases
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Filesystem { .. } => "filesystem_error",
            Error::Engine(_) => "engine_error",
            Error::ExternalTool(_) => "external_tool_error",
            Error::NotSupported(_) => "not_supported",
            Error::InvalidRequest(_) => "invalid_request",
            Error::Busy => "busy",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
        }
    }
}
