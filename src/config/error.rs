//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Numeric environment variable could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    NumberParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Numeric value is outside its allowed range.
    #[error("{name} value {value} is out of range")]
    OutOfRange { name: &'static str, value: u64 },

    /// A setting that must carry text was empty.
    #[error("{name} must not be empty")]
    EmptyValue { name: &'static str },

    /// Source URL lacks an `http://` or `https://` scheme.
    #[error("invalid source url '{value}': expected http:// or https://")]
    InvalidUrl { value: String },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
