//! core::yaml
//!
//! Conversion of parsed YAML documents into JSON trees.
//!
//! YAML mappings accept keys of any type, while the schemas and the
//! downstream packaging stage only understand textual keys. Every document
//! therefore goes through [`to_json`], which rejects the first non-string
//! key it meets (in document order) and names where it was found.
//!
//! # Example
//!
//! ```
//! use appdef::core::yaml::{parse_document, to_json};
//!
//! let doc = parse_document(b"my-parameters:\n    1: toto\n").unwrap();
//! let err = to_json(&doc).unwrap_err();
//! assert_eq!(err.to_string(), "Non-string key in my-parameters: 1");
//! ```

use serde_json::{Map, Number, Value as JsonValue};
use serde_yaml::Value as YamlValue;
use thiserror::Error;

/// Errors from structural checks on a parsed document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StructureError {
    /// A mapping key was not a string.
    #[error("Non-string key {}: {key}", location(.path))]
    NonStringKey {
        /// Dotted path of the enclosing mapping; empty at top level.
        path: String,
        /// Rendering of the offending key.
        key: String,
    },
}

fn location(path: &str) -> String {
    if path.is_empty() {
        "at top level".to_string()
    } else {
        format!("in {path}")
    }
}

/// Parse raw bytes as a single YAML document.
///
/// An empty document parses as `Null`.
pub fn parse_document(raw: &[u8]) -> Result<YamlValue, serde_yaml::Error> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(YamlValue::Null);
    }
    serde_yaml::from_slice(raw)
}

/// Convert a YAML tree to a JSON tree, requiring textual mapping keys at
/// every depth.
///
/// Nested mapping paths are joined with `.`, sequence elements append
/// `[index]`.
pub fn to_json(value: &YamlValue) -> Result<JsonValue, StructureError> {
    convert(value, "")
}

fn convert(value: &YamlValue, prefix: &str) -> Result<JsonValue, StructureError> {
    match value {
        YamlValue::Null => Ok(JsonValue::Null),
        YamlValue::Bool(b) => Ok(JsonValue::Bool(*b)),
        YamlValue::Number(n) => Ok(convert_number(n)),
        YamlValue::String(s) => Ok(JsonValue::String(s.clone())),
        YamlValue::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| convert(item, &format!("{prefix}[{idx}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(JsonValue::Array),
        YamlValue::Mapping(mapping) => {
            let mut object = Map::new();
            for (key, entry) in mapping {
                let key = match key {
                    YamlValue::String(key) => key,
                    other => {
                        return Err(StructureError::NonStringKey {
                            path: prefix.to_string(),
                            key: describe_key(other),
                        })
                    }
                };
                let child = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                object.insert(key.clone(), convert(entry, &child)?);
            }
            Ok(JsonValue::Object(object))
        }
        YamlValue::Tagged(tagged) => convert(&tagged.value, prefix),
    }
}

fn convert_number(n: &serde_yaml::Number) -> JsonValue {
    if let Some(i) = n.as_i64() {
        JsonValue::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        JsonValue::Number(u.into())
    } else {
        // .nan and .inf have no JSON number form
        n.as_f64()
            .and_then(Number::from_f64)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(n.to_string()))
    }
}

fn describe_key(key: &YamlValue) -> String {
    match key {
        YamlValue::Null => "null".to_string(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Number(n) => n.to_string(),
        YamlValue::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| "<unprintable>".to_string()),
    }
}
