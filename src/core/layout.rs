//! core::layout
//!
//! Reserved filenames for the core documents of an application directory.
//!
//! # Architecture
//!
//! An application directory holds three core documents at its root:
//! - `metadata.yml` - Application metadata
//! - `parameters.yml` - Default parameter values
//! - `docker-compose.yml` - Compose document
//!
//! Everything else under the root is an attachment. The packaging stage
//! reads the same names, so the defaults here must not drift from it.
//!
//! **Hard rule:** No code may hardcode these names. The scanner and the
//! default-files constructor receive a [`CoreFileNames`] value, which keeps
//! them testable with alternate naming schemes.
//!
//! # Example
//!
//! ```
//! use appdef::core::layout::CoreFileNames;
//! use std::path::{Path, PathBuf};
//!
//! let names = CoreFileNames::default();
//! assert_eq!(
//!     names.metadata_path(Path::new("/apps/web")),
//!     PathBuf::from("/apps/web/metadata.yml")
//! );
//! assert!(names.is_core("parameters.yml"));
//! assert!(!names.is_core("config.cfg"));
//! ```

use std::path::{Path, PathBuf};

/// Default metadata filename.
pub const METADATA_FILE_NAME: &str = "metadata.yml";

/// Default parameters filename.
pub const PARAMETERS_FILE_NAME: &str = "parameters.yml";

/// Default compose filename.
pub const COMPOSE_FILE_NAME: &str = "docker-compose.yml";

/// The set of reserved core filenames.
///
/// # Invariants
///
/// - Names are bare filenames (no separators)
/// - Names are pairwise distinct
///
/// Values built through [`crate::core::config::Config`] are validated
/// against these invariants; [`CoreFileNames::default`] satisfies them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreFileNames {
    /// Filename of the metadata document.
    pub metadata: String,

    /// Filename of the parameters document.
    pub parameters: String,

    /// Filename of the compose document.
    pub compose: String,
}

impl Default for CoreFileNames {
    fn default() -> Self {
        Self {
            metadata: METADATA_FILE_NAME.to_string(),
            parameters: PARAMETERS_FILE_NAME.to_string(),
            compose: COMPOSE_FILE_NAME.to_string(),
        }
    }
}

impl CoreFileNames {
    /// Create a naming scheme from explicit filenames.
    pub fn new(
        metadata: impl Into<String>,
        parameters: impl Into<String>,
        compose: impl Into<String>,
    ) -> Self {
        Self {
            metadata: metadata.into(),
            parameters: parameters.into(),
            compose: compose.into(),
        }
    }

    /// Check whether `file_name` is one of the reserved names.
    ///
    /// This says nothing about exclusion: only the scan root treats
    /// reserved names as core documents.
    pub fn is_core(&self, file_name: &str) -> bool {
        self.iter().any(|name| name == file_name)
    }

    /// Iterate the reserved names in metadata, parameters, compose order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [
            self.metadata.as_str(),
            self.parameters.as_str(),
            self.compose.as_str(),
        ]
        .into_iter()
    }

    // =========================================================================
    // Paths under an application root
    // =========================================================================

    /// Get the path of the metadata document under `root`.
    pub fn metadata_path(&self, root: &Path) -> PathBuf {
        root.join(&self.metadata)
    }

    /// Get the path of the parameters document under `root`.
    pub fn parameters_path(&self, root: &Path) -> PathBuf {
        root.join(&self.parameters)
    }

    /// Get the path of the compose document under `root`.
    pub fn compose_path(&self, root: &Path) -> PathBuf {
        root.join(&self.compose)
    }
}
