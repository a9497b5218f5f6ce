//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! The only configurable concern is the set of reserved filenames. They
//! must agree with whatever packaging stage consumes the assembled
//! application, so the core never looks them up on its own: it uses the
//! defaults unless the caller loads a config file here and passes the
//! resulting [`CoreFileNames`] in explicitly. This is the seam for
//! integrations and tests that need an alternate naming scheme.
//!
//! # Locations
//!
//! Only an explicit path passed to [`Config::load`] is read. With no path,
//! or a path that does not exist, defaults are used. Unreadable or
//! malformed files are an error.
//!
//! # Example
//!
//! ```no_run
//! use appdef::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("/etc/appdef/config.toml"))).unwrap();
//! println!("metadata file: {}", config.core_file_names().metadata);
//! ```

pub mod schema;

pub use schema::{FileConfig, LayoutConfig};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::layout::CoreFileNames;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents (defaults when no file was loaded)
    pub file: FileConfig,
    /// Path to the loaded config file (if any)
    loaded_from: Option<PathBuf>,
}

impl Config {
    /// Load configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => {
                let file = Self::read_file_config(path)?;
                tracing::debug!(path = %path.display(), "loaded config");
                Ok(Config {
                    file,
                    loaded_from: Some(path.to_path_buf()),
                })
            }
            _ => Ok(Config::default()),
        }
    }

    /// Parse configuration from a TOML string.
    ///
    /// `origin` is only used in error messages.
    pub fn from_toml_str(contents: &str, origin: &Path) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;
        Ok(Config {
            file,
            loaded_from: None,
        })
    }

    /// Read and parse a config file.
    fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_toml_str(&contents, path).map(|config| config.file)
    }

    /// Get the effective reserved filenames.
    pub fn core_file_names(&self) -> CoreFileNames {
        self.file
            .layout
            .as_ref()
            .map(LayoutConfig::resolve)
            .unwrap_or_default()
    }

    /// Get the path to the loaded config file.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_explicit_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(Some(&temp.path().join("absent.toml"))).unwrap();
        assert_eq!(config.core_file_names(), CoreFileNames::default());
        assert!(config.loaded_from().is_none());
    }

    #[test]
    fn load_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [layout]
            metadata = "app.meta.yml"
            "#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        let names = config.core_file_names();
        assert_eq!(names.metadata, "app.meta.yml");
        assert_eq!(names.parameters, "parameters.yml");
        assert_eq!(config.loaded_from(), Some(path.as_path()));
    }

    #[test]
    fn no_path_uses_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.core_file_names(), CoreFileNames::default());
        assert!(config.loaded_from().is_none());
    }

    #[test]
    fn unknown_fields_rejected() {
        let result = Config::from_toml_str(
            "[layout]\nmetadata = \"m.yml\"\nunknown_field = true\n",
            Path::new("inline"),
        );
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn invalid_layout_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[layout]\nmetadata = \"../metadata.yml\"\n").unwrap();

        let result = Config::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn empty_file_is_defaults() {
        let config = Config::from_toml_str("", Path::new("inline")).unwrap();
        assert_eq!(config.core_file_names(), CoreFileNames::default());
    }
}
