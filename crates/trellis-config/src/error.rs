//! Error types for configuration operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Field contained an invalid value.
    #[error("invalid value for '{field}': {message}")]
    InvalidField {
        /// Field that failed validation.
        field: String,
        /// Human-readable error description.
        message: String,
    },
    /// Field is not part of the settings document.
    #[error("unknown settings field '{field}'")]
    UnknownField {
        /// Name of the unexpected field.
        field: String,
    },
    /// Settings document was not a JSON object.
    #[error("settings document must be a JSON object")]
    NotAnObject,
    /// Settings document could not be decoded.
    #[error("failed to decode settings document")]
    Parse {
        /// Source serde error.
        #[source]
        source: serde_json::Error,
    },
    /// Settings file could not be read.
    #[error("failed to read settings file {}", path.display())]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Source IO error.
        #[source]
        source: io::Error,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
