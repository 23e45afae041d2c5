//! Error types for the index pipeline.
//!
//! Per-submission problems are reported as data in a
//! [`ValidationResult`](crate::ValidationResult). Only failures that stop the
//! whole run surface as [`IndexError`].

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Result type for index operations.
pub type IndexResult<T> = std::result::Result<T, IndexError>;

/// Errors that abort an index run.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The submissions root does not exist or is not a directory.
    #[error("Submissions directory not found: {}", .0.display())]
    SubmissionsRootMissing(PathBuf),

    /// A directory or file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output index or a stamped submission could not be written.
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record file that is not a JSON object.
    #[error("{} is not a JSON object", .0.display())]
    NotAnObject(PathBuf),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid or unreadable configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
