//! Flattening of nested configuration trees into a single-level key space.
//!
//! Structured formats (JSON, YAML) parse into a [`Value`] tree which is then
//! collapsed into a flat map of `UPPER_SNAKE` keys. Entries the flat model
//! cannot represent (nulls, arrays) are reported as [`Skipped`] rather than
//! failing the load.

use std::collections::BTreeMap;

use serde::Deserialize;

/// The canonical flat configuration representation: normalized string keys
/// mapped to string values.
pub type FlatMap = BTreeMap<String, String>;

/// A generic configuration value tree, as produced by the structured-format
/// parsers. Discarded after flattening.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

/// An entry dropped during flattening or line scanning, with the reason.
///
/// Malformed or unrepresentable entries are dropped rather than failing
/// the whole load; each drop is surfaced as data so callers can observe
/// exactly what was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// The flattened key (or `line N` for delimited-text input) that was
    /// dropped.
    pub location: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The value was null, which has no flat representation.
    NullValue,
    /// The value was an array, which has no flat representation.
    Array,
    /// A delimited-text line had no `=` separator.
    MissingSeparator,
}

/// The result of flattening a tree: the flat entries plus every skipped
/// location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flattened {
    pub map: FlatMap,
    pub skipped: Vec<Skipped>,
}

/// Flattens a nested mapping into single-level entries.
///
/// Each key is upper-cased and appended to `prefix`. Scalar leaves are
/// stringified canonically (`true`/`false` for booleans, shortest
/// round-trippable decimal for numbers); nested mappings recurse with the
/// joined key plus `_` as the new prefix. Later entries win on key
/// collision. Null and array leaves are recorded in `skipped`.
///
/// Pure function: no I/O, no shared state.
pub fn flatten(tree: &BTreeMap<String, Value>, prefix: &str) -> Flattened {
    let mut out = Flattened::default();
    flatten_into(tree, prefix, &mut out);
    out
}

fn flatten_into(tree: &BTreeMap<String, Value>, prefix: &str, out: &mut Flattened) {
    for (key, value) in tree {
        let child_key = format!("{prefix}{}", key.to_uppercase());
        match value {
            Value::String(s) => {
                out.map.insert(child_key, s.clone());
            }
            Value::Bool(b) => {
                out.map.insert(child_key, b.to_string());
            }
            Value::Integer(i) => {
                out.map.insert(child_key, i.to_string());
            }
            Value::Float(f) => {
                out.map.insert(child_key, f.to_string());
            }
            Value::Map(nested) => {
                flatten_into(nested, &format!("{child_key}_"), out);
            }
            Value::Null => out.skipped.push(Skipped {
                location: child_key,
                reason: SkipReason::NullValue,
            }),
            Value::Array(_) => out.skipped.push(Skipped {
                location: child_key,
                reason: SkipReason::Array,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tree(json: &str) -> BTreeMap<String, Value> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_flatten_scalars() {
        let result = flatten(
            &tree(r#"{"name": "api", "port": 8080, "ratio": 0.5, "debug": true}"#),
            "",
        );

        let mut expected = FlatMap::new();
        expected.insert("NAME".into(), "api".into());
        expected.insert("PORT".into(), "8080".into());
        expected.insert("RATIO".into(), "0.5".into());
        expected.insert("DEBUG".into(), "true".into());
        assert_eq!(result.map, expected);
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn test_flatten_nested_joins_path_with_underscore() {
        let result = flatten(
            &tree(r#"{"database": {"credentials": {"user": "root"}, "port": 5432}}"#),
            "",
        );

        assert_eq!(
            result.map.get("DATABASE_CREDENTIALS_USER"),
            Some(&"root".to_string())
        );
        assert_eq!(result.map.get("DATABASE_PORT"), Some(&"5432".to_string()));
        assert_eq!(result.map.len(), 2);
    }

    #[test]
    fn test_flatten_applies_prefix() {
        let result = flatten(&tree(r#"{"host": "localhost"}"#), "SERVER_");
        assert_eq!(result.map.get("SERVER_HOST"), Some(&"localhost".to_string()));
    }

    #[test]
    fn test_flatten_is_idempotent_on_flat_input() {
        let once = flatten(&tree(r#"{"a": "1", "b": "2"}"#), "");
        let again: BTreeMap<String, Value> = once
            .map
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();

        assert_eq!(flatten(&again, "").map, once.map);
    }

    #[test]
    fn test_flatten_empty_tree() {
        let result = flatten(&BTreeMap::new(), "");
        assert!(result.map.is_empty());
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn test_flatten_skips_null_and_array_leaves() {
        let result = flatten(&tree(r#"{"tags": [1, 2], "owner": null, "kept": "x"}"#), "");

        assert_eq!(result.map.len(), 1);
        assert_eq!(result.map.get("KEPT"), Some(&"x".to_string()));
        assert_eq!(
            result.skipped,
            vec![
                Skipped {
                    location: "OWNER".into(),
                    reason: SkipReason::NullValue,
                },
                Skipped {
                    location: "TAGS".into(),
                    reason: SkipReason::Array,
                },
            ]
        );
    }

    #[test]
    fn test_flatten_only_unsupported_leaves_yields_empty_map() {
        let result = flatten(&tree(r#"{"a": null, "b": [true]}"#), "");
        assert!(result.map.is_empty());
        assert_eq!(result.skipped.len(), 2);
    }

    #[test]
    fn test_float_stringifies_without_trailing_zeroes() {
        let result = flatten(&tree(r#"{"whole": 2.0, "frac": 0.25}"#), "");
        assert_eq!(result.map.get("WHOLE"), Some(&"2".to_string()));
        assert_eq!(result.map.get("FRAC"), Some(&"0.25".to_string()));
    }

    #[test]
    fn test_value_tree_deserializes_from_yaml() {
        let parsed: BTreeMap<String, Value> =
            serde_yaml_ng::from_str("server:\n  host: localhost\n  port: 443\n").unwrap();
        let result = flatten(&parsed, "");
        assert_eq!(result.map.get("SERVER_HOST"), Some(&"localhost".to_string()));
        assert_eq!(result.map.get("SERVER_PORT"), Some(&"443".to_string()));
    }
}
