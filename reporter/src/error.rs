//! @ai:module:intent Define error types for diagnostic aggregation
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for checkrun-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Raised only by `RunResult::exit_on_failure`; carries the fatal diagnostic's message.
    #[error("Run aborted: {message}")]
    RunAborted { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid diagnostic: {0}")]
    InvalidDiagnostic(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// @ai:intent Check whether this error is the intentional fatal-abort signal
    /// @ai:effects pure
    pub fn is_abort(&self) -> bool {
        matches!(self, Error::RunAborted { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
