//! Layered configuration loader.
//!
//! Reads the `appsettings*.json` stack from the content root, overlays
//! environment variables and produces a `ResolvedConfiguration`.

mod env;
mod layer_io;
mod merge;
mod utils;


use crate::resolved::SectionValues;
use crate::{ConfigError, ConfigLayer, ConfigLayerSource, HostEnvironment, ResolvedConfiguration};
use log::{debug, info};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Base settings file; the only required layer.
pub const BASE_CONFIG_FILE: &str = "appsettings.json";

/// Options controlling where layers are read from.
#[derive(Debug, Clone)]
pub struct ConfigLoadOptions {
    /// Directory holding the settings files.
    pub content_root: PathBuf,
    /// Environment used to pick environment specific files.
    pub environment: HostEnvironment,
    /// Only variables starting with this prefix are applied, prefix stripped.
    pub env_prefix: Option<String>,
    /// Explicit variables to overlay instead of the process environment.
    pub env_vars: Option<Vec<(String, String)>>,
}

impl ConfigLoadOptions {
    /// Create options for the provided content root using the build environment.
    pub fn new(content_root: impl AsRef<Path>) -> Self {
        Self {
            content_root: content_root.as_ref().to_path_buf(),
            environment: HostEnvironment::current(),
            env_prefix: None,
            env_vars: None,
        }
    }

    /// Override the environment used for environment specific layers.
    pub fn with_environment(mut self, environment: HostEnvironment) -> Self {
        self.environment = environment;
        self
    }

    /// Restrict environment overrides to variables carrying `prefix`.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Overlay an explicit set of variables instead of the process environment.
    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = Some(
            vars.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        );
        self
    }
}

impl ResolvedConfiguration {
    /// Load the layered configuration.
    ///
    /// Layer precedence (low -> high): `appsettings.json`,
    /// `appsettings.Secrets.json`, `appsettings.Shared.json`,
    /// `appsettings.Shared.{env}.json`, `appsettings.{env}.json`, environment
    /// variables. Only the base file is required.
    pub fn load(options: ConfigLoadOptions) -> Result<Self, ConfigError> {
        let root = utils::normalize_path(&options.content_root)?;
        let environment = options.environment;
        info!(
            "loading layered config (content_root={}, environment={})",
            root.display(),
            environment
        );

        let base_path = root.join(BASE_CONFIG_FILE);
        let base = layer_io::load_required_layer(ConfigLayerSource::Base, &base_path)?;
        let mut layers = vec![base.meta];
        let mut merged = base.value;
        let mut section_values = SectionValues::new();

        for (source, file_name) in layer_io::optional_layer_files(environment) {
            let path = root.join(&file_name);
            if let Some(layer) = layer_io::load_optional_layer(source, &path)? {
                debug!("using {} (source={})", file_name, source.label());
                merge::merge_json_values(&mut merged, &layer.value, &mut section_values);
                layers.push(layer.meta);
            }
        }

        let vars = match options.env_vars {
            Some(vars) => vars,
            None => std::env::vars().collect(),
        };
        let applied = env::apply_env_overrides(
            &mut merged,
            vars,
            options.env_prefix.as_deref(),
            &mut section_values,
        );
        debug!("applied environment overrides (count={})", applied);
        layers.push(ConfigLayer {
            source: ConfigLayerSource::EnvironmentVariables,
            path: None,
        });

        let config = ResolvedConfiguration::from_value(merged, environment)?
            .with_layers(layers)
            .with_section_values(section_values);
        info!("layered config loaded (layers={})", config.layers().len());
        Ok(config)
    }
}

/// Internal representation of a loaded config layer.
#[derive(Debug, Clone)]
struct LoadedLayer {
    meta: ConfigLayer,
    value: Value,
}
