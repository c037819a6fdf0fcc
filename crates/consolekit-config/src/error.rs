//! Error types for config loading and settings access.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned while loading config or reading typed settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading a config file failed.
    #[error("failed to read config: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// Parsing a config file failed.
    #[error("failed to parse config: {0}")]
    ParseFailed(#[from] json5::Error),
    /// The base settings file does not exist.
    #[error("required config file not found: {}", .path.display())]
    MissingRequired { path: PathBuf },
    /// A layer has the wrong shape.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// A present value could not be converted to the requested type.
    #[error("invalid value for {key}: '{value}' ({message})")]
    Conversion {
        key: String,
        value: String,
        message: String,
    },
    /// A value does not name any declared constant of the target enum.
    #[error("invalid value for {key}: '{value}' (expected one of: {})", .expected.join(", "))]
    Parse {
        key: String,
        value: String,
        expected: Vec<&'static str>,
    },
}
