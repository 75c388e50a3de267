//! Error types for server bootstrap.
//!
//! Request-level failures never surface here: they are rendered into HTTP
//! responses by the handlers. These are the errors that stop the process.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors raised while configuring or starting the server
#[derive(Debug, Error)]
pub enum ServerError {
    /// Config file unreadable or malformed
    #[error("Failed to load config file '{}': {reason}", path.display())]
    Config {
        /// File that was being loaded
        path: PathBuf,
        /// Underlying read or parse error
        reason: String,
    },

    /// Listen address that does not parse
    #[error("Invalid listen address '{0}'")]
    InvalidAddress(String),

    /// Socket or log file I/O
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Initial snapshot load failed
    #[error("Failed loading data from file: {0}")]
    Metadata(#[from] metadir_core::Error),
}
