//! Read access to the merged configuration tree.

use crate::{ConfigError, ConfigLayer, HostEnvironment};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Separator between path segments in configuration keys.
pub const KEY_DELIMITER: char = ':';

/// Scalar values of paths that also hold a section, keyed by lowercase path.
pub(crate) type SectionValues = BTreeMap<String, String>;

/// Merged view of every configuration layer.
///
/// Built once at startup and read-only afterwards. Keys are colon separated
/// paths (`Logging:MinimumLevel:Default`) matched without regard to ASCII
/// case; array elements are addressed by index (`Servers:0`). A key may
/// carry a value and child keys at the same time (`A` and `A:B`).
#[derive(Debug, Clone)]
pub struct ResolvedConfiguration {
    root: Value,
    section_values: SectionValues,
    environment: HostEnvironment,
    layers: Vec<ConfigLayer>,
}

impl ResolvedConfiguration {
    /// Wrap an already merged tree. The root must be an object.
    pub fn from_value(value: Value, environment: HostEnvironment) -> Result<Self, ConfigError> {
        if !value.is_object() {
            return Err(ConfigError::Invalid(
                "configuration root must be an object".to_string(),
            ));
        }
        Ok(Self {
            root: value,
            section_values: SectionValues::new(),
            environment,
            layers: Vec::new(),
        })
    }

    pub(crate) fn with_layers(mut self, layers: Vec<ConfigLayer>) -> Self {
        self.layers = layers;
        self
    }

    pub(crate) fn with_section_values(mut self, section_values: SectionValues) -> Self {
        self.section_values = section_values;
        self
    }

    /// Environment the configuration was resolved for.
    pub fn environment(&self) -> HostEnvironment {
        self.environment
    }

    /// Layers that contributed, lowest precedence first.
    pub fn layers(&self) -> &[ConfigLayer] {
        &self.layers
    }

    /// Scalar value at `key` rendered as a string.
    ///
    /// A section (object or array) has no value unless a layer also set the
    /// key itself to a scalar. JSON `null` yields `None`.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.section(key)? {
            Value::Object(_) | Value::Array(_) => {
                self.section_values.get(&key.to_ascii_lowercase()).cloned()
            }
            value => scalar_to_string(value),
        }
    }

    /// True when `key` resolves to a scalar value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Any node at `key`, including objects and arrays.
    pub fn section(&self, key: &str) -> Option<&Value> {
        let mut current = &self.root;
        for segment in key.split(KEY_DELIMITER) {
            current = child(current, segment)?;
        }
        Some(current)
    }

    /// Children of the object at `key` that carry a value, sorted by key.
    pub fn children(&self, key: &str) -> Vec<(String, String)> {
        match self.section(key) {
            Some(Value::Object(map)) => map
                .keys()
                .filter_map(|name| {
                    self.get(&format!("{key}{KEY_DELIMITER}{name}"))
                        .map(|value| (name.clone(), value))
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Look up a direct child by object key (ASCII case-insensitive) or array index.
pub(crate) fn child<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => find_key(map, segment).and_then(|key| map.get(&key)),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|idx| items.get(idx)),
        _ => None,
    }
}

/// Existing spelling of `segment` in `map`, if any.
pub(crate) fn find_key(map: &Map<String, Value>, segment: &str) -> Option<String> {
    if map.contains_key(segment) {
        return Some(segment.to_string());
    }
    map.keys()
        .find(|key| key.eq_ignore_ascii_case(segment))
        .cloned()
}

pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        Value::Bool(value) => Some(value.to_string()),
        Value::Null | Value::Object(_) | Value::Array(_) => None,
    }
}
