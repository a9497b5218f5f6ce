//! appdef - Assemble application definitions from their source documents
//!
//! An application is defined by one metadata document, any number of
//! parameter and compose documents, and a tree of auxiliary files
//! (attachments). This crate turns those sources into a validated,
//! in-memory [`app::App`] that packaging and rendering stages consume.
//!
//! # Architecture
//!
//! - [`app`] - The `App` aggregate and its option-based construction
//! - [`core`] - Domain types, schemas, validation, scanning, and configuration
//!
//! # Correctness Invariants
//!
//! 1. Metadata is only stored once it passes schema validation
//! 2. Parameter documents are validated as a merged whole
//! 3. Attachments are unique and sorted byte-wise by relative path
//! 4. Construction either yields a complete `App` or an error, never both
//!
//! # Example
//!
//! ```no_run
//! use appdef::app::new_app_from_default_files;
//!
//! let app = new_app_from_default_files("./my-app").unwrap();
//! for attachment in app.attachments() {
//!     println!("{} ({} bytes)", attachment.path(), attachment.size());
//! }
//! ```

pub mod app;
pub mod core;
