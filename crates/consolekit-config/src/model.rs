//! Host environment and layer metadata.

use std::fmt;
use std::path::PathBuf;

/// Runtime mode the configuration is resolved for.
///
/// Fixed for the lifetime of the process; environment specific settings files
/// are selected by its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEnvironment {
    Development,
    Production,
}

impl HostEnvironment {
    /// Environment implied by the build profile.
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            HostEnvironment::Development
        } else {
            HostEnvironment::Production
        }
    }

    /// Name used in environment specific file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            HostEnvironment::Development => "Development",
            HostEnvironment::Production => "Production",
        }
    }
}

impl Default for HostEnvironment {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for HostEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Origin for a single config layer in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// `appsettings.json`, the only required layer.
    Base,
    /// `appsettings.Secrets.json`.
    Secrets,
    /// `appsettings.Shared.json`.
    Shared,
    /// `appsettings.Shared.{environment}.json`.
    SharedEnvironment,
    /// `appsettings.{environment}.json`.
    Environment,
    /// Process environment variables (highest precedence).
    EnvironmentVariables,
}

impl ConfigLayerSource {
    /// Short label used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            ConfigLayerSource::Base => "base",
            ConfigLayerSource::Secrets => "secrets",
            ConfigLayerSource::Shared => "shared",
            ConfigLayerSource::SharedEnvironment => "shared-environment",
            ConfigLayerSource::Environment => "environment",
            ConfigLayerSource::EnvironmentVariables => "environment-variables",
        }
    }
}

/// Metadata about a layer that contributed to the resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayer {
    /// Layer origin.
    pub source: ConfigLayerSource,
    /// Location on disk for file layers.
    pub path: Option<PathBuf>,
}
