//! IO helpers for reading config layers from disk.

use super::{BASE_CONFIG_FILE, LoadedLayer};
use crate::{ConfigError, ConfigLayer, ConfigLayerSource, HostEnvironment};
use log::debug;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Optional file layers in precedence order (low -> high).
pub(super) fn optional_layer_files(
    environment: HostEnvironment,
) -> [(ConfigLayerSource, String); 4] {
    [
        (
            ConfigLayerSource::Secrets,
            "appsettings.Secrets.json".to_string(),
        ),
        (
            ConfigLayerSource::Shared,
            "appsettings.Shared.json".to_string(),
        ),
        (
            ConfigLayerSource::SharedEnvironment,
            format!("appsettings.Shared.{environment}.json"),
        ),
        (
            ConfigLayerSource::Environment,
            format!("appsettings.{environment}.json"),
        ),
    ]
}

/// Load an optional layer if the provided path exists.
pub(super) fn load_optional_layer(
    source: ConfigLayerSource,
    path: &Path,
) -> Result<Option<LoadedLayer>, ConfigError> {
    if !path.is_file() {
        debug!(
            "optional layer missing (source={}, path={})",
            source.label(),
            path.display()
        );
        return Ok(None);
    }

    Ok(Some(read_layer(source, path)?))
}

/// Load a layer that must exist.
pub(super) fn load_required_layer(
    source: ConfigLayerSource,
    path: &Path,
) -> Result<LoadedLayer, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::MissingRequired {
            path: path.to_path_buf(),
        });
    }
    read_layer(source, path)
}

fn read_layer(source: ConfigLayerSource, path: &Path) -> Result<LoadedLayer, ConfigError> {
    debug!(
        "loading config layer (source={}, path={})",
        source.label(),
        path.display()
    );
    let contents = fs::read_to_string(path)?;
    let value: Value = json5::from_str(&contents)?;
    if !value.is_object() {
        return Err(ConfigError::Invalid(format!(
            "{} must contain an object at the top level",
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| BASE_CONFIG_FILE.to_string())
        )));
    }
    Ok(LoadedLayer {
        meta: ConfigLayer {
            source,
            path: Some(path.to_path_buf()),
        },
        value,
    })
}
