//! core::metadata::schema
//!
//! Application metadata schema (v0.2).
//!
//! # Schema Design
//!
//! Metadata is a YAML mapping with:
//! - `version` and `name` (required strings)
//! - `description` and `namespace` (optional strings)
//! - `maintainers`: list of `{name, email}` where `name` is required and
//!   `email` must be a valid address
//!
//! Unknown top-level properties are tolerated; unknown maintainer
//! properties are not.
//!
//! # Example
//!
//! ```
//! use appdef::core::metadata::schema::parse_metadata;
//!
//! let meta = parse_metadata(b"name: test-app\nversion: 0.1.0").unwrap();
//! assert_eq!(meta.name, "test-app");
//! assert_eq!(meta.version, "0.1.0");
//! ```

use std::fmt;
use std::sync::LazyLock;

use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::core::validate::{check, compile, SchemaError};
use crate::core::yaml::{parse_document, to_json, StructureError};

/// Current metadata schema version.
pub const SCHEMA_VERSION: &str = "v0.2";

static METADATA_SCHEMA: LazyLock<JSONSchema> = LazyLock::new(|| {
    compile(&metadata_schema_document()).expect("metadata schema is a valid JSON Schema")
});

/// The metadata schema as a JSON Schema document.
pub fn metadata_schema_document() -> Value {
    json!({
        "title": format!("application metadata {SCHEMA_VERSION}"),
        "type": "object",
        "required": ["version", "name"],
        "properties": {
            "version": {"type": "string"},
            "name": {"type": "string"},
            "description": {"type": "string"},
            "namespace": {"type": "string"},
            "maintainers": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["name"],
                    "additionalProperties": false,
                    "properties": {
                        "name": {"type": "string"},
                        "email": {"type": "string", "format": "email"}
                    }
                }
            }
        }
    })
}

/// Errors from metadata operations.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to parse metadata: {0}")]
    ParseError(String),

    #[error("failed to parse metadata: {0}")]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("failed to decode metadata: {0}")]
    DecodeError(String),
}

/// Validate a parsed metadata document against the metadata schema.
///
/// Every violation is reported in one [`SchemaError`].
pub fn validate_metadata(document: &Value) -> Result<(), SchemaError> {
    check("metadata", &METADATA_SCHEMA, document)?;
    tracing::debug!(schema = SCHEMA_VERSION, "validated metadata");
    Ok(())
}

/// Parse raw metadata bytes, validate them, and decode the result.
///
/// # Errors
///
/// Returns an error if:
/// - The bytes are not a YAML document
/// - A mapping key is not a string
/// - The document violates the metadata schema
pub fn parse_metadata(raw: &[u8]) -> Result<AppMetadata, MetadataError> {
    let yaml = parse_document(raw).map_err(|e| MetadataError::ParseError(e.to_string()))?;
    let document = to_json(&yaml)?;
    validate_metadata(&document)?;
    serde_json::from_value(document).map_err(|e| MetadataError::DecodeError(e.to_string()))
}

/// Application metadata.
///
/// Use [`parse_metadata`] to build one from raw bytes with validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppMetadata {
    /// Application version
    pub version: String,

    /// Application name
    pub name: String,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Registry namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// People responsible for the application
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub maintainers: Vec<Maintainer>,
}

impl AppMetadata {
    /// Maintainers joined for display, e.g. `alice:alice@example.com, bob`.
    pub fn maintainers_display(&self) -> String {
        self.maintainers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// An application maintainer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Maintainer {
    /// Maintainer name
    pub name: String,

    /// Contact address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl fmt::Display for Maintainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.email {
            Some(email) => write!(f, "{}:{}", self.name, email),
            None => write!(f, "{}", self.name),
        }
    }
}
