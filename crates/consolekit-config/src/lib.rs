//! Layered configuration and typed settings for console hosts.
//!
//! This crate owns the `appsettings*.json` layering rules, the merged
//! `ResolvedConfiguration` view and the `AppSettings` facade used by the host
//! and by application services.

mod error;
mod loader;
mod model;
mod resolved;
mod settings;

/// Public error type returned by config loading and settings access.
pub use error::ConfigError;
/// Loader options and file names.
pub use loader::{BASE_CONFIG_FILE, ConfigLoadOptions};
pub use model::{ConfigLayer, ConfigLayerSource, HostEnvironment};
pub use resolved::{KEY_DELIMITER, ResolvedConfiguration};
/// Typed settings facade.
pub use settings::{AppSettings, SettingEnum};
