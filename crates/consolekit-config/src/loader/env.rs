//! Environment variable overlay.

use super::merge::{into_section, is_section, join_path};
use crate::resolved::{KEY_DELIMITER, SectionValues, find_key};
use serde_json::Value;

/// Separator accepted in variable names in place of `:`.
const ENV_DELIMITER: &str = "__";

/// Apply variables on top of the merged tree, returning how many were applied.
///
/// `Section__Key` and `Section:Key` both address `Section:Key`. Variables
/// whose name contains an empty segment are ignored.
pub(super) fn apply_env_overrides(
    root: &mut Value,
    vars: impl IntoIterator<Item = (String, String)>,
    prefix: Option<&str>,
    section_values: &mut SectionValues,
) -> usize {
    let mut applied = 0;
    for (name, value) in vars {
        let name = match prefix {
            Some(prefix) => match name.strip_prefix(prefix) {
                Some(stripped) => stripped.to_string(),
                None => continue,
            },
            None => name,
        };
        let key = name.replace(ENV_DELIMITER, &KEY_DELIMITER.to_string());
        let segments: Vec<&str> = key.split(KEY_DELIMITER).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            continue;
        }
        set_path(root, &segments, "", value, section_values);
        applied += 1;
    }
    applied
}

/// Write `value` at `segments`, creating intermediate sections as needed.
///
/// Existing array elements are addressed by index and the next free index
/// appends. Any other index turns the array into an index-keyed section so
/// earlier elements are kept.
fn set_path(
    node: &mut Value,
    segments: &[&str],
    path: &str,
    value: String,
    section_values: &mut SectionValues,
) {
    let Some((head, rest)) = segments.split_first() else {
        if is_section(node) {
            section_values.insert(path.to_ascii_lowercase(), value);
        } else {
            *node = Value::String(value);
        }
        return;
    };
    let child_path = join_path(path, head);

    if let Value::Array(items) = node {
        if let Ok(index) = head.parse::<usize>() {
            if index == items.len() {
                items.push(Value::Null);
            }
            if let Some(item) = items.get_mut(index) {
                set_path(item, rest, &child_path, value, section_values);
                return;
            }
        }
    }

    into_section(node, path, section_values);
    let Value::Object(map) = node else {
        return;
    };
    let key = find_key(map, head).unwrap_or_else(|| head.to_string());
    let child = map.entry(key).or_insert(Value::Null);
    set_path(child, rest, &child_path, value, section_values);
}

#[cfg(test)]
mod tests {
    use super::apply_env_overrides;
    use crate::resolved::SectionValues;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    fn apply(
        root: &mut Value,
        pairs: &[(&str, &str)],
        prefix: Option<&str>,
    ) -> (usize, SectionValues) {
        let mut section_values = SectionValues::new();
        let applied = apply_env_overrides(root, vars(pairs), prefix, &mut section_values);
        (applied, section_values)
    }

    #[test]
    fn double_underscore_addresses_nested_keys() {
        let mut root = json!({ "Logging": { "MinimumLevel": { "Default": "Information" } } });
        let (applied, _) = apply(
            &mut root,
            &[("logging__minimumlevel__default", "Debug"), ("Plain", "x")],
            None,
        );
        assert_eq!(applied, 2);
        assert_eq!(
            root,
            json!({
                "Logging": { "MinimumLevel": { "Default": "Debug" } },
                "Plain": "x"
            })
        );
    }

    #[test]
    fn prefix_filters_and_strips() {
        let mut root = json!({});
        apply(&mut root, &[("APP_Name", "svc"), ("PATH", "/bin")], Some("APP_"));
        assert_eq!(root, json!({ "Name": "svc" }));
    }

    #[test]
    fn skips_empty_segments_and_indexes_arrays() {
        let mut root = json!({ "Hosts": ["a", "b"] });
        let (applied, _) = apply(
            &mut root,
            &[("__bad", "x"), ("Hosts__1", "z"), ("Trailing:", "y")],
            None,
        );
        assert_eq!(applied, 1);
        assert_eq!(root, json!({ "Hosts": ["a", "z"] }));
    }

    #[test]
    fn next_index_appends_to_array() {
        let mut root = json!({ "Hosts": ["a", "b"] });
        apply(&mut root, &[("Hosts__2", "c")], None);
        assert_eq!(root, json!({ "Hosts": ["a", "b", "c"] }));
    }

    #[test]
    fn sparse_index_keeps_existing_elements() {
        let mut root = json!({ "Hosts": ["a", "b", "c"] });
        apply(&mut root, &[("Hosts__5", "e")], None);
        assert_eq!(
            root,
            json!({ "Hosts": { "0": "a", "1": "b", "2": "c", "5": "e" } })
        );
    }

    #[test]
    fn nested_variable_keeps_scalar_as_section_value() {
        let mut root = json!({ "A": "x" });
        let (_, section_values) = apply(&mut root, &[("A__B", "y")], None);
        assert_eq!(root, json!({ "A": { "B": "y" } }));
        assert_eq!(section_values.get("a"), Some(&"x".to_string()));
    }
}
