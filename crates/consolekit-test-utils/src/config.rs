use consolekit_config::{HostEnvironment, ResolvedConfiguration};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn write_settings(root: &Path, name: &str, contents: &str) {
    fs::write(root.join(name), contents).expect("write settings");
}

/// Temporary content root populated with `(file name, contents)` pairs.
pub fn settings_dir(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().expect("tempdir");
    for (name, contents) in files {
        write_settings(temp.path(), name, contents);
    }
    temp
}

/// In-memory configuration for tests that do not need files.
pub fn resolved_config(value: Value) -> Arc<ResolvedConfiguration> {
    Arc::new(
        ResolvedConfiguration::from_value(value, HostEnvironment::Development)
            .expect("resolved config"),
    )
}
