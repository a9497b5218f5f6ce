//! core
//!
//! Core domain types, schemas, and operations.
//!
//! # Modules
//!
//! - [`types`] - Strong types: AttachmentPath, Attachment
//! - [`layout`] - Reserved core filenames
//! - [`yaml`] - YAML to JSON conversion with textual-key checks
//! - [`validate`] - JSON Schema validation with aggregated violations
//! - [`metadata`] - Metadata schema and parsing
//! - [`parameters`] - Parameter merging and validation
//! - [`scan`] - Attachment discovery
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are fixed and versioned
//! - All validation and scanning output is deterministic

pub mod config;
pub mod layout;
pub mod metadata;
pub mod parameters;
pub mod scan;
pub mod types;
pub mod validate;
pub mod yaml;
