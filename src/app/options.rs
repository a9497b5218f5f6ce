//! app::options
//!
//! Construction steps for an [`App`].
//!
//! # Contract
//!
//! Every option either mutates the fields it is responsible for and
//! returns `Ok(())`, or leaves those fields untouched and returns an
//! error. Options validate before they commit:
//! - Metadata options parse and validate the document first
//! - Parameter options validate the merge of all parameter documents
//!   (already present plus new) first
//!
//! # Example
//!
//! ```
//! use appdef::app::options::{AppOption, WithParameters};
//! use appdef::app::App;
//!
//! let mut app = App::new("my-app");
//! WithParameters::new("foo: bar".as_bytes()).apply(&mut app).unwrap();
//! assert_eq!(app.parameters_raw()[0], b"foo: bar");
//! ```

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::{App, AppError, Cleanup};
use crate::core::layout::CoreFileNames;
use crate::core::metadata::parse_metadata;
use crate::core::parameters::merge_parameters;
use crate::core::scan::scan_attachments;

/// A unit of construction applied to an in-progress [`App`].
///
/// Closures of type `FnMut(&mut App) -> Result<(), AppError>` are options
/// too.
pub trait AppOption {
    /// Short description used when reporting which option failed.
    fn describe(&self) -> String;

    /// Apply the option to `app`.
    fn apply(&mut self, app: &mut App) -> Result<(), AppError>;
}

impl<F> AppOption for F
where
    F: FnMut(&mut App) -> Result<(), AppError>,
{
    fn describe(&self) -> String {
        "custom option".to_string()
    }

    fn apply(&mut self, app: &mut App) -> Result<(), AppError> {
        self(app)
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, AppError> {
    let bytes = fs::read(path).map_err(|e| AppError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read file");
    Ok(bytes)
}

fn read_files(paths: &[PathBuf]) -> Result<Vec<Vec<u8>>, AppError> {
    paths.iter().map(|path| read_file(path)).collect()
}

fn read_stream(reader: &mut impl Read, what: &'static str) -> Result<Vec<u8>, AppError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|source| AppError::ReadStream { what, source })?;
    Ok(bytes)
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("'{}'", p.display()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate the merge of existing and new parameter documents, then commit.
fn append_parameters(app: &mut App, documents: Vec<Vec<u8>>) -> Result<(), AppError> {
    let mut candidate = app.parameters_raw.clone();
    candidate.extend(documents);
    let merged = merge_parameters(&candidate)?;
    app.parameters_raw = candidate;
    app.parameters = merged;
    Ok(())
}

/// Validate metadata, then commit both the raw bytes and the parsed model.
fn set_metadata(app: &mut App, raw: Vec<u8>) -> Result<(), AppError> {
    let parsed = parse_metadata(&raw)?;
    app.metadata_raw = Some(raw);
    app.metadata = Some(parsed);
    Ok(())
}

// =============================================================================
// Path and lifecycle
// =============================================================================

/// Replace the application path.
#[derive(Debug, Clone)]
pub struct WithPath {
    path: String,
}

impl WithPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl AppOption for WithPath {
    fn describe(&self) -> String {
        format!("path '{}'", self.path)
    }

    fn apply(&mut self, app: &mut App) -> Result<(), AppError> {
        app.path = self.path.clone();
        Ok(())
    }
}

/// Register a teardown action. The option never runs it; the owner of
/// the [`App`] does, through [`App::run_cleanup`] or [`App::take_cleanup`].
pub struct WithCleanup {
    cleanup: Option<Cleanup>,
}

impl WithCleanup {
    pub fn new(cleanup: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cleanup: Some(Box::new(cleanup)),
        }
    }
}

impl AppOption for WithCleanup {
    fn describe(&self) -> String {
        "cleanup".to_string()
    }

    fn apply(&mut self, app: &mut App) -> Result<(), AppError> {
        if let Some(cleanup) = self.cleanup.take() {
            app.cleanup = Some(cleanup);
        }
        Ok(())
    }
}

// =============================================================================
// Parameters
// =============================================================================

/// Append parameter documents read from files, in the order given.
#[derive(Debug, Clone)]
pub struct WithParametersFiles {
    paths: Vec<PathBuf>,
}

impl WithParametersFiles {
    pub fn new<P: Into<PathBuf>>(paths: impl IntoIterator<Item = P>) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl AppOption for WithParametersFiles {
    fn describe(&self) -> String {
        format!("parameters files {}", display_paths(&self.paths))
    }

    fn apply(&mut self, app: &mut App) -> Result<(), AppError> {
        let documents = read_files(&self.paths)?;
        append_parameters(app, documents)
    }
}

/// Append one parameter document read from a stream.
pub struct WithParameters<R> {
    reader: R,
}

impl<R: Read> WithParameters<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> AppOption for WithParameters<R> {
    fn describe(&self) -> String {
        "parameters stream".to_string()
    }

    fn apply(&mut self, app: &mut App) -> Result<(), AppError> {
        let document = read_stream(&mut self.reader, "parameters")?;
        append_parameters(app, vec![document])
    }
}

// =============================================================================
// Compose
// =============================================================================

/// Append compose documents read from files, in the order given.
#[derive(Debug, Clone)]
pub struct WithComposeFiles {
    paths: Vec<PathBuf>,
}

impl WithComposeFiles {
    pub fn new<P: Into<PathBuf>>(paths: impl IntoIterator<Item = P>) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl AppOption for WithComposeFiles {
    fn describe(&self) -> String {
        format!("compose files {}", display_paths(&self.paths))
    }

    fn apply(&mut self, app: &mut App) -> Result<(), AppError> {
        let documents = read_files(&self.paths)?;
        app.composes.extend(documents);
        Ok(())
    }
}

/// Append one compose document read from a stream.
pub struct WithComposes<R> {
    reader: R,
}

impl<R: Read> WithComposes<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> AppOption for WithComposes<R> {
    fn describe(&self) -> String {
        "compose stream".to_string()
    }

    fn apply(&mut self, app: &mut App) -> Result<(), AppError> {
        let document = read_stream(&mut self.reader, "compose")?;
        app.composes.push(document);
        Ok(())
    }
}

// =============================================================================
// Metadata
// =============================================================================

/// Load and validate metadata from a file.
#[derive(Debug, Clone)]
pub struct MetadataFile {
    path: PathBuf,
}

impl MetadataFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AppOption for MetadataFile {
    fn describe(&self) -> String {
        format!("metadata file '{}'", self.path.display())
    }

    fn apply(&mut self, app: &mut App) -> Result<(), AppError> {
        let raw = read_file(&self.path)?;
        set_metadata(app, raw)
    }
}

/// Load and validate metadata from a stream.
pub struct Metadata<R> {
    reader: R,
}

impl<R: Read> Metadata<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> AppOption for Metadata<R> {
    fn describe(&self) -> String {
        "metadata stream".to_string()
    }

    fn apply(&mut self, app: &mut App) -> Result<(), AppError> {
        let raw = read_stream(&mut self.reader, "metadata")?;
        set_metadata(app, raw)
    }
}

// =============================================================================
// Attachments
// =============================================================================

/// Scan a directory and replace the attachment list.
#[derive(Debug, Clone)]
pub struct WithAttachments {
    root: PathBuf,
    names: CoreFileNames,
}

impl WithAttachments {
    pub fn new(root: impl Into<PathBuf>, names: CoreFileNames) -> Self {
        Self {
            root: root.into(),
            names,
        }
    }
}

impl AppOption for WithAttachments {
    fn describe(&self) -> String {
        format!("attachments under '{}'", self.root.display())
    }

    fn apply(&mut self, app: &mut App) -> Result<(), AppError> {
        app.attachments = scan_attachments(&self.root, &self.names)?;
        Ok(())
    }
}
