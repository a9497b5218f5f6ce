//! app::error
//!
//! Error taxonomy for application construction.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::metadata::MetadataError;
use crate::core::parameters::ParametersError;
use crate::core::scan::ScanError;

/// Errors from building an [`App`](super::App).
#[derive(Debug, Error)]
pub enum AppError {
    /// A file could not be read.
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An in-memory source could not be read to the end.
    #[error("failed to read {what} stream: {source}")]
    ReadStream {
        what: &'static str,
        source: std::io::Error,
    },

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Parameters(#[from] ParametersError),

    #[error("failed to scan attachments: {0}")]
    Scan(#[from] ScanError),

    /// Failure raised by a caller-supplied option.
    #[error("{0}")]
    Custom(String),

    /// An option failed during [`new_app`](super::new_app).
    #[error("option {index} ({option}) failed: {source}")]
    OptionFailed {
        /// Position of the option in the supplied sequence.
        index: usize,
        /// The option's own description.
        option: String,
        source: Box<AppError>,
    },
}

impl AppError {
    /// Build a caller-defined failure.
    pub fn custom(message: impl Into<String>) -> Self {
        AppError::Custom(message.into())
    }

    /// Strip [`AppError::OptionFailed`] wrappers and return the failure
    /// raised by the option itself.
    pub fn root_cause(&self) -> &AppError {
        match self {
            AppError::OptionFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
