//! app
//!
//! The assembled application and its construction protocol.
//!
//! # Construction
//!
//! An [`App`] starts as a bare value holding only its path. A sequence of
//! [`AppOption`]s is then applied strictly in order:
//!
//! ```text
//! App::new(path) -> option 0 -> option 1 -> ... -> App
//!                      |
//!                      v fails
//!                   AppError (partial App dropped)
//! ```
//!
//! The first failing option aborts construction. Mutations made by earlier
//! options are not rolled back; the partial value is simply never handed
//! to the caller.
//!
//! # Default Files
//!
//! [`new_app_from_default_files`] is a preset: it loads whichever reserved
//! core documents exist at the directory root and scans the rest of the
//! tree for attachments.
//!
//! # Example
//!
//! ```
//! use appdef::app::options::{Metadata, WithComposes, WithParameters};
//! use appdef::app::App;
//!
//! let app = App::builder("my-app")
//!     .option(Metadata::new("name: web\nversion: 0.1.0".as_bytes()))
//!     .option(WithParameters::new("port: 80".as_bytes()))
//!     .option(WithComposes::new("services: {}".as_bytes()))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(app.name(), Some("web"));
//! assert_eq!(app.composes().len(), 1);
//! ```

pub mod error;
pub mod options;

pub use error::AppError;
pub use options::AppOption;

use std::fmt;
use std::path::Path;

use crate::core::layout::CoreFileNames;
use crate::core::metadata::AppMetadata;
use crate::core::parameters::Parameters;
use crate::core::types::Attachment;
use options::{MetadataFile, WithAttachments, WithComposeFiles, WithParametersFiles};

/// Teardown action registered on an [`App`].
pub type Cleanup = Box<dyn FnOnce() + Send + 'static>;

/// An application assembled from its source documents.
///
/// Once returned by [`new_app`] the value is read-only from the caller's
/// perspective. A registered cleanup is the owner's responsibility to run
/// exactly once.
#[derive(Default)]
pub struct App {
    path: String,
    metadata_raw: Option<Vec<u8>>,
    metadata: Option<AppMetadata>,
    parameters_raw: Vec<Vec<u8>>,
    parameters: Parameters,
    composes: Vec<Vec<u8>>,
    attachments: Vec<Attachment>,
    cleanup: Option<Cleanup>,
}

impl App {
    /// Create a bare application holding only its path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Start a builder that collects options for [`new_app`].
    pub fn builder<'a>(path: impl Into<String>) -> AppBuilder<'a> {
        AppBuilder {
            path: path.into(),
            options: Vec::new(),
        }
    }

    /// Build from a directory using explicit reserved filenames.
    pub fn from_directory(dir: &Path, names: &CoreFileNames) -> Result<Self, AppError> {
        new_app(dir.to_string_lossy(), default_file_options(dir, names))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Root location of the application.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw metadata bytes, present only once validated.
    pub fn metadata_raw(&self) -> Option<&[u8]> {
        self.metadata_raw.as_deref()
    }

    /// Parsed metadata.
    pub fn metadata(&self) -> Option<&AppMetadata> {
        self.metadata.as_ref()
    }

    /// Application name from metadata.
    pub fn name(&self) -> Option<&str> {
        self.metadata.as_ref().map(|m| m.name.as_str())
    }

    /// Application version from metadata.
    pub fn version(&self) -> Option<&str> {
        self.metadata.as_ref().map(|m| m.version.as_str())
    }

    /// Raw parameter documents in the order they were supplied.
    pub fn parameters_raw(&self) -> &[Vec<u8>] {
        &self.parameters_raw
    }

    /// Merge of all parameter documents.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Raw compose documents in the order they were supplied.
    pub fn composes(&self) -> &[Vec<u8>] {
        &self.composes
    }

    /// Attachments sorted by path.
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Check if the application carries any attachment.
    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    // =========================================================================
    // Cleanup
    // =========================================================================

    /// Check if a cleanup action is registered and not yet consumed.
    pub fn has_cleanup(&self) -> bool {
        self.cleanup.is_some()
    }

    /// Take the cleanup action, leaving none registered.
    pub fn take_cleanup(&mut self) -> Option<Cleanup> {
        self.cleanup.take()
    }

    /// Run the cleanup action if one is registered. Later calls do nothing.
    pub fn run_cleanup(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            tracing::debug!(path = %self.path, "running cleanup");
            cleanup();
        }
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("path", &self.path)
            .field("metadata", &self.metadata)
            .field("parameters_raw", &self.parameters_raw.len())
            .field("composes", &self.composes.len())
            .field("attachments", &self.attachments)
            .field("cleanup", &self.cleanup.is_some())
            .finish()
    }
}

/// Collects options and builds an [`App`] through [`new_app`].
pub struct AppBuilder<'a> {
    path: String,
    options: Vec<Box<dyn AppOption + 'a>>,
}

impl<'a> AppBuilder<'a> {
    /// Append an option.
    pub fn option(mut self, option: impl AppOption + 'a) -> Self {
        self.options.push(Box::new(option));
        self
    }

    /// Append several boxed options.
    pub fn options(mut self, options: impl IntoIterator<Item = Box<dyn AppOption + 'a>>) -> Self {
        self.options.extend(options);
        self
    }

    /// Apply every option in order.
    pub fn build(self) -> Result<App, AppError> {
        new_app(self.path, self.options)
    }
}

/// Create an application at `path` by applying `options` in order.
///
/// # Errors
///
/// Returns [`AppError::OptionFailed`] wrapping the first option failure.
/// No partial application is returned.
pub fn new_app<'a>(
    path: impl Into<String>,
    options: impl IntoIterator<Item = Box<dyn AppOption + 'a>>,
) -> Result<App, AppError> {
    let mut app = App::new(path);

    for (index, mut option) in options.into_iter().enumerate() {
        let description = option.describe();
        tracing::debug!(path = %app.path, index, option = %description, "applying option");

        option
            .apply(&mut app)
            .map_err(|source| AppError::OptionFailed {
                index,
                option: description,
                source: Box::new(source),
            })?;
    }

    Ok(app)
}

/// Options for a directory laid out with `names`: each reserved document
/// that exists at the root, then an attachment scan of the whole tree.
pub fn default_file_options(dir: &Path, names: &CoreFileNames) -> Vec<Box<dyn AppOption>> {
    let mut options: Vec<Box<dyn AppOption>> = Vec::new();

    let metadata = names.metadata_path(dir);
    if metadata.is_file() {
        options.push(Box::new(MetadataFile::new(metadata)));
    }

    let parameters = names.parameters_path(dir);
    if parameters.is_file() {
        options.push(Box::new(WithParametersFiles::new([parameters])));
    }

    let compose = names.compose_path(dir);
    if compose.is_file() {
        options.push(Box::new(WithComposeFiles::new([compose])));
    }

    options.push(Box::new(WithAttachments::new(dir, names.clone())));
    options
}

/// Create an application from a directory using the default reserved
/// filenames.
pub fn new_app_from_default_files(dir: impl AsRef<Path>) -> Result<App, AppError> {
    App::from_directory(dir.as_ref(), &CoreFileNames::default())
}
