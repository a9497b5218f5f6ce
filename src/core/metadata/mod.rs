//! core::metadata
//!
//! Application metadata schema and parsing.
//!
//! # Modules
//!
//! - [`schema`] - Metadata schema, validation, and typed model
//!
//! # Validation
//!
//! Raw metadata is parsed as YAML, checked for textual keys, then
//! validated against the schema. All schema violations are reported
//! together:
//!
//! ```text
//! failed to validate metadata:
//! - (root): version is required
//! - maintainers.2.email: Does not match format 'email'
//! ```
//!
//! # Example
//!
//! ```
//! use appdef::core::metadata::parse_metadata;
//!
//! let err = parse_metadata(b"name: app").unwrap_err();
//! assert!(err.to_string().contains("(root): version is required"));
//! ```

pub mod schema;

pub use schema::{
    parse_metadata, validate_metadata, AppMetadata, Maintainer, MetadataError, SCHEMA_VERSION,
};
