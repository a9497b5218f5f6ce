//! core::validate
//!
//! JSON Schema validation with aggregated, stable error reporting.
//!
//! # Design
//!
//! Schemas are JSON Schema (draft 7) documents built in code (see
//! [`crate::core::metadata`] and [`crate::core::parameters`]) and compiled
//! once with `jsonschema`. Validation collects **every** violation instead
//! of stopping at the first one, and renders each as a [`Violation`]:
//! a dotted field path plus a rule description.
//!
//! # Ordering
//!
//! Violations follow the validator's traversal order, which follows the
//! keyword order of the schema document. Schemas here declare `type`, then
//! `required`, then `properties`, so a missing property is reported before
//! problems inside present ones. Array items are visited by index.
//!
//! # Example
//!
//! ```
//! use appdef::core::validate::{compile, validate};
//! use serde_json::json;
//!
//! let schema = compile(&json!({
//!     "type": "object",
//!     "required": ["version"],
//!     "properties": {"version": {"type": "string"}}
//! }))
//! .unwrap();
//!
//! let violations = validate(&schema, &json!({"name": "x"}));
//! assert_eq!(violations.len(), 1);
//! assert_eq!(violations[0].to_string(), "(root): version is required");
//! ```

use std::fmt;
use std::sync::LazyLock;

use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::{Draft, JSONSchema, ValidationError};
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

const ADDR_SPEC: &str = r"[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*";

// Bare address, or an address in angle brackets after an optional display name.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(?:{ADDR_SPEC}|[^<>]*<{ADDR_SPEC}>)$"))
        .expect("email pattern is a valid regex")
});

/// Check the `email` string format.
///
/// Accepts `user@example.com` as well as `User <user@example.com>`.
pub fn is_email(s: &str) -> bool {
    EMAIL.is_match(s.trim())
}

/// A single rule violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted field path, or `(root)` for the document itself.
    pub field: String,
    /// Human-readable rule description.
    pub description: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.description)
    }
}

/// Aggregated validation failure for one document kind.
///
/// Renders as a header line followed by one `- ` bullet per violation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to validate {subject}:\n{}", bullets(.violations))]
pub struct SchemaError {
    /// Document kind, e.g. `metadata`.
    pub subject: &'static str,
    /// Violations in traversal order. Never empty.
    pub violations: Vec<Violation>,
}

fn bullets(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("- {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Compile a schema document.
///
/// The `email` format uses [`is_email`].
///
/// # Errors
///
/// Returns the compiler's message if `schema` is not a valid draft 7 schema.
pub fn compile(schema: &Value) -> Result<JSONSchema, String> {
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .with_format("email", is_email)
        .compile(schema)
        .map_err(|e| e.to_string())
}

/// Validate `document` against `schema`, returning every violation in
/// traversal order. An empty result means the document is valid.
pub fn validate(schema: &JSONSchema, document: &Value) -> Vec<Violation> {
    match schema.validate(document) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.flat_map(violations).collect(),
    }
}

/// Validate and wrap any violations into a [`SchemaError`] for `subject`.
pub fn check(subject: &'static str, schema: &JSONSchema, document: &Value) -> Result<(), SchemaError> {
    let violations = validate(schema, document);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaError {
            subject,
            violations,
        })
    }
}

fn violations(error: ValidationError<'_>) -> Vec<Violation> {
    let path = field(&error.instance_path.to_string());
    let single = |description: String| {
        vec![Violation {
            field: path.clone(),
            description,
        }]
    };

    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let name = match property {
                Value::String(name) => name.clone(),
                other => other.to_string(),
            };
            single(format!("{name} is required"))
        }
        ValidationErrorKind::Format { format } => {
            single(format!("Does not match format '{format}'"))
        }
        ValidationErrorKind::Type {
            kind: TypeKind::Single(expected),
        } => single(format!(
            "Invalid type. Expected: {expected}, given: {}",
            json_type_name(&error.instance)
        )),
        ValidationErrorKind::AdditionalProperties { unexpected } => unexpected
            .iter()
            .map(|key| Violation {
                field: path.clone(),
                description: format!("Additional property {key} is not allowed"),
            })
            .collect(),
        _ => single(error.to_string()),
    }
}

/// Render a JSON pointer such as `/maintainers/2/email` as
/// `maintainers.2.email`.
fn field(pointer: &str) -> String {
    let trimmed = pointer.trim_start_matches('/');
    if trimmed.is_empty() {
        return "(root)".to_string();
    }
    trimmed
        .split('/')
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join(".")
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
