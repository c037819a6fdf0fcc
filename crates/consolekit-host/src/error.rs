//! Error types for the console host.

use consolekit_config::ConfigError;
use thiserror::Error;

/// Errors returned while composing or running a console application.
#[derive(Debug, Error)]
pub enum HostError {
    /// Configuration could not be loaded or read.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A capability was requested but never registered.
    #[error("service not registered: {name} (required by {})", .required_by.as_deref().unwrap_or("host"))]
    MissingService {
        name: String,
        required_by: Option<String>,
    },
    /// Construction would recurse into a service already being built.
    #[error("circular dependency: {}", .0.join(" -> "))]
    CircularDependency(Vec<String>),
    /// The stored instance does not have the requested type.
    #[error("service {name} was registered with a different type")]
    TypeMismatch { name: String },
    /// The registration callback registered its own application.
    #[error("application capability registered more than once")]
    DuplicateApplication,
    /// A process-wide logger was already installed.
    #[error("failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
    /// The application's entry method failed.
    #[error("application failed: {0:#}")]
    Application(#[source] anyhow::Error),
}
