//! JSON merge helpers for layered configuration.

use crate::resolved::{KEY_DELIMITER, SectionValues, find_key, scalar_to_string};
use serde_json::{Map, Value};

/// Merge overlay values into the base, recursively overriding objects.
///
/// Object keys are matched without regard to ASCII case; the spelling already
/// present in `base` is kept. Arrays merge element by element, so an overlay
/// that sets index 0 leaves indices 1.. of the base in place. A scalar and a
/// section that meet at the same path both survive: the section stays in the
/// tree and the scalar is kept in `section_values`. JSON `null` in the
/// overlay is absent and leaves the base untouched.
pub(super) fn merge_json_values(
    base: &mut Value,
    overlay: &Value,
    section_values: &mut SectionValues,
) {
    merge_at(base, overlay, "", section_values);
}

fn merge_at(base: &mut Value, overlay: &Value, path: &str, section_values: &mut SectionValues) {
    if overlay.is_null() {
        return;
    }
    if !is_section(overlay) {
        if is_section(base) {
            record_section_value(section_values, path, overlay);
        } else {
            *base = overlay.clone();
        }
        return;
    }
    if !is_section(base) {
        record_section_value(section_values, path, base);
        *base = overlay.clone();
        return;
    }

    if let (Value::Array(base_items), Value::Array(overlay_items)) = (&mut *base, overlay) {
        for (index, value) in overlay_items.iter().enumerate() {
            match base_items.get_mut(index) {
                Some(existing) => {
                    let child_path = join_path(path, &index.to_string());
                    merge_at(existing, value, &child_path, section_values);
                }
                None => base_items.push(value.clone()),
            }
        }
        return;
    }

    into_section(base, path, section_values);
    let Value::Object(base_map) = base else {
        return;
    };
    for (key, value) in section_entries(overlay) {
        let child_path = join_path(path, &key);
        match find_key(base_map, &key) {
            Some(existing_key) => {
                if let Some(existing) = base_map.get_mut(&existing_key) {
                    merge_at(existing, value, &child_path, section_values);
                }
            }
            None => {
                base_map.insert(key, value.clone());
            }
        }
    }
}

/// Make `node` an object that child keys can be added to.
///
/// Array elements keep their index as key. A scalar becomes the section's
/// own value.
pub(super) fn into_section(node: &mut Value, path: &str, section_values: &mut SectionValues) {
    match node.take() {
        Value::Object(map) => *node = Value::Object(map),
        Value::Array(items) => {
            *node = Value::Object(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| (index.to_string(), item))
                    .collect(),
            );
        }
        scalar => {
            record_section_value(section_values, path, &scalar);
            *node = Value::Object(Map::new());
        }
    }
}

/// Keep `value` as the value of the section at `path`.
pub(super) fn record_section_value(section_values: &mut SectionValues, path: &str, value: &Value) {
    if let Some(text) = scalar_to_string(value) {
        section_values.insert(path.to_ascii_lowercase(), text);
    }
}

pub(super) fn is_section(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

pub(super) fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{parent}{KEY_DELIMITER}{segment}")
    }
}

fn section_entries(value: &Value) -> Vec<(String, &Value)> {
    match value {
        Value::Object(map) => map.iter().map(|(key, item)| (key.clone(), item)).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect(),
        _ => Vec::new(),
    }
}
