//! Error types for metadata lookups
//!
//! This module defines the error kinds a lookup or reload can produce.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! | Kind | Status | Raised by |
//! |------|--------|-----------|
//! | `VersionNotFound` | 404 | version alias resolution |
//! | `PathNotFound` | 404 | path resolution |
//! | `MalformedPathSegment` | 400 | percent decoding |
//! | `Serialization` | 500 | JSON encoding |
//! | `RefreshFailure` | 500 | snapshot sources, via the reload endpoint |

use thiserror::Error;

/// Result type alias for metadata operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the metadata directory
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The requested version is not in the snapshot (and is not a resolvable alias)
    #[error("Invalid version")]
    VersionNotFound(String),

    /// The path does not resolve under the chosen version
    #[error("Not found")]
    PathNotFound(String),

    /// A path segment could not be percent-decoded
    #[error("invalid URL escape {segment:?}: {reason}")]
    MalformedPathSegment {
        /// The raw, still-escaped segment
        segment: String,
        /// What was wrong with it
        reason: String,
    },

    /// Encoding a value failed
    #[error("Error serializing to JSON: {0}")]
    Serialization(String),

    /// A snapshot source could not produce a new snapshot
    #[error("{0}")]
    RefreshFailure(String),
}

impl Error {
    /// HTTP status code this error is reported with
    pub fn status_code(&self) -> u16 {
        match self {
            Error::VersionNotFound(_) | Error::PathNotFound(_) => 404,
            Error::MalformedPathSegment { .. } => 400,
            Error::Serialization(_) | Error::RefreshFailure(_) => 500,
        }
    }

    /// Check if this is one of the not-found kinds
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::VersionNotFound(_) | Error::PathNotFound(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
