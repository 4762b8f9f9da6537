//! Error taxonomy for the export pipeline.
//!
//! Every failure an export run can hit maps to exactly one variant, so the
//! binary can report a single human-readable line and exit non-zero. All
//! errors are terminal for the run; nothing is retried and no partial
//! output is written.

use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = ExportError> = std::result::Result<T, E>;

/// Everything that can go wrong between argument parsing and output.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Conflicting or invalid command line arguments. Raised during
    /// argument resolution, before any I/O happens.
    #[error("{0}")]
    Argument(String),

    /// The wishlist endpoint answered with an error status: the list is
    /// private, or the supplied session cookie was rejected.
    #[error("{0}")]
    Auth(String),

    /// Transport failure, or an error status from the price and list
    /// endpoints.
    #[error("network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    /// A response body or loaded file was not shaped as expected.
    #[error("{0}")]
    Format(String),

    /// The save/load file could not be read or written.
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A filter was requested that needs data the run never fetched.
    #[error("{0}")]
    Filter(String),

    /// An output or sort field name outside the allow-list.
    #[error("unknown field: {0}")]
    Field(String),
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Format(format!("invalid JSON: {err}"))
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Format(format!("delimited output failed: {err}"))
    }
}
