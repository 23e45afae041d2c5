//! Error types for the circuit inspector.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while inspecting circuit files.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QasmError {
    /// A circuit file or directory could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for inspector operations.
pub type QasmResult<T> = Result<T, QasmError>;
