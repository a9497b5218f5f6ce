//! core::parameters
//!
//! Parameter documents: parsing, merging, and validation.
//!
//! # Merging
//!
//! An application may carry several parameter documents. They are merged
//! in order: later documents override earlier ones, mappings merge
//! recursively, and any other value is replaced wholesale. Validation runs
//! on the merged result, not on each document alone.
//!
//! # Structure
//!
//! Independently of the schema, every mapping key at every depth must be a
//! string. A numbered key such as `1: toto` is rejected with an error that
//! names the key and the mapping that holds it.
//!
//! # Example
//!
//! ```
//! use appdef::core::parameters::merge_parameters;
//!
//! let docs = vec![
//!     b"web:\n  port: 80\n  image: nginx\n".to_vec(),
//!     b"web:\n  port: 8080\n".to_vec(),
//! ];
//! let params = merge_parameters(&docs).unwrap();
//! assert_eq!(params.get("web.port"), Some(&serde_json::json!(8080)));
//! assert_eq!(params.get("web.image"), Some(&serde_json::json!("nginx")));
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use jsonschema::JSONSchema;
use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::core::validate::{check, compile, SchemaError};
use crate::core::yaml::{parse_document, to_json, StructureError};

static PARAMETERS_SCHEMA: LazyLock<JSONSchema> = LazyLock::new(|| {
    compile(&json!({"type": "object"})).expect("parameters schema is a valid JSON Schema")
});

/// Errors from parameter operations.
#[derive(Debug, Error)]
pub enum ParametersError {
    #[error("failed to parse parameters document {index}: {message}")]
    ParseError { index: usize, message: String },

    #[error("invalid parameters: {0}")]
    Structure(#[from] StructureError),

    /// A single document is not a mapping.
    #[error("invalid parameters document {index}: {source}")]
    Document { index: usize, source: SchemaError },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Validate a parsed parameters document.
///
/// Checks textual keys at every depth first, then the parameters schema.
/// A non-string key is reported even when the document is otherwise
/// schema-valid.
pub fn validate_parameters(document: &serde_yaml::Value) -> Result<(), ParametersError> {
    let json = to_json(document)?;
    check("parameters", &PARAMETERS_SCHEMA, &normalize_empty(json))?;
    Ok(())
}

/// Parse, merge, and validate raw parameter documents in order.
///
/// Every document must be a mapping (or empty) on its own, before any
/// merging. An empty list yields empty parameters.
pub fn merge_parameters(raws: &[Vec<u8>]) -> Result<Parameters, ParametersError> {
    let mut merged = Value::Object(Map::new());
    for (index, raw) in raws.iter().enumerate() {
        let yaml = parse_document(raw).map_err(|e| ParametersError::ParseError {
            index,
            message: e.to_string(),
        })?;
        let document = normalize_empty(to_json(&yaml)?);
        check("parameters", &PARAMETERS_SCHEMA, &document)
            .map_err(|source| ParametersError::Document { index, source })?;
        merge_into(&mut merged, document);
    }

    check("parameters", &PARAMETERS_SCHEMA, &merged)?;
    match merged {
        Value::Object(map) => Ok(Parameters(map)),
        _ => Ok(Parameters::default()),
    }
}

fn normalize_empty(value: Value) -> Value {
    match value {
        Value::Null => Value::Object(Map::new()),
        other => other,
    }
}

fn merge_into(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_into(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Merged parameters.
///
/// Keys keep the order in which documents introduced them;
/// [`Parameters::flatten`] is sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Parameters(Map<String, Value>);

impl Parameters {
    /// Check if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Top-level mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Look up a value by dotted key, e.g. `web.port`.
    pub fn get(&self, dotted_key: &str) -> Option<&Value> {
        let mut parts = dotted_key.split('.');
        let first = parts.next()?;
        let mut current = self.0.get(first)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Flatten nested mappings into dotted keys.
    ///
    /// Strings are kept verbatim, null becomes an empty string, and other
    /// scalars and sequences use their JSON rendering.
    ///
    /// # Example
    ///
    /// ```
    /// use appdef::core::parameters::merge_parameters;
    ///
    /// let params = merge_parameters(&[b"a:\n  b: 1\n  c: x\nd: true\n".to_vec()]).unwrap();
    /// let flat: Vec<_> = params.flatten().into_iter().collect();
    /// assert_eq!(
    ///     flat,
    ///     vec![
    ///         ("a.b".to_string(), "1".to_string()),
    ///         ("a.c".to_string(), "x".to_string()),
    ///         ("d".to_string(), "true".to_string()),
    ///     ]
    /// );
    /// ```
    pub fn flatten(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        for (key, value) in &self.0 {
            flatten_into(key, value, &mut out);
        }
        out
    }
}

fn flatten_into(prefix: &str, value: &Value, out: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(&format!("{prefix}.{key}"), child, out);
            }
        }
        Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        Value::Null => {
            out.insert(prefix.to_string(), String::new());
        }
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}
