/// Structured error types for masterdebater-core.
///
/// Library crates get composable `thiserror` variants; the CLI wraps them
/// in `anyhow` at the edge.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for masterdebater-core operations
#[derive(Error, Debug)]
pub enum DebateError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// JSON column payload could not be encoded or decoded
    #[error("JSON error in {context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },

    /// Payload was written by a newer schema than this build understands
    #[error("Unsupported {payload} version {found} (max supported: {supported})")]
    UnsupportedVersion {
        payload: &'static str,
        found: u32,
        supported: u32,
    },

    /// Stored text does not name a known enum variant
    #[error("Invalid {field} value: '{value}'")]
    InvalidVariant { field: &'static str, value: String },

    /// Configuration file missing, unreadable or malformed
    #[error("Configuration error in {path:?}: {reason}")]
    Config { path: PathBuf, reason: String },
}

/// Result type alias for masterdebater-core operations
pub type Result<T> = std::result::Result<T, DebateError>;

impl DebateError {
    /// Create a JSON error with context
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid variant error
    pub fn invalid_variant(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidVariant {
            field,
            value: value.into(),
        }
    }

    /// Create a config error
    pub fn config(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
