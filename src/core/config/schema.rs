//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing: every reserved filename must
//! be a bare, non-empty filename, and the three names must be distinct.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::layout::CoreFileNames;

/// Top-level configuration file.
///
/// # Example
///
/// ```toml
/// [layout]
/// metadata = "metadata.yml"
/// parameters = "parameters.yml"
/// compose = "docker-compose.yml"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Reserved filename overrides
    pub layout: Option<LayoutConfig>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(layout) = &self.layout {
            layout.validate()?;
        }
        Ok(())
    }
}

/// Reserved filename overrides. Unset names keep their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Metadata document filename
    pub metadata: Option<String>,

    /// Parameters document filename
    pub parameters: Option<String>,

    /// Compose document filename
    pub compose: Option<String>,
}

impl LayoutConfig {
    /// Resolve against the defaults.
    pub fn resolve(&self) -> CoreFileNames {
        let defaults = CoreFileNames::default();
        CoreFileNames {
            metadata: self.metadata.clone().unwrap_or(defaults.metadata),
            parameters: self.parameters.clone().unwrap_or(defaults.parameters),
            compose: self.compose.clone().unwrap_or(defaults.compose),
        }
    }

    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a name is not a bare filename
    /// or two resolved names collide.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let names = self.resolve();
        for (key, name) in [
            ("metadata", &names.metadata),
            ("parameters", &names.parameters),
            ("compose", &names.compose),
        ] {
            validate_file_name(key, name)?;
        }

        if names.metadata == names.parameters
            || names.metadata == names.compose
            || names.parameters == names.compose
        {
            return Err(ConfigError::InvalidValue(format!(
                "layout filenames must be distinct, got '{}', '{}', '{}'",
                names.metadata, names.parameters, names.compose
            )));
        }

        Ok(())
    }
}

fn validate_file_name(key: &str, name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::InvalidValue(format!(
            "layout.{key} cannot be empty"
        )));
    }
    if name == "." || name == ".." {
        return Err(ConfigError::InvalidValue(format!(
            "layout.{key} cannot be '{name}'"
        )));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(ConfigError::InvalidValue(format!(
            "layout.{key} must be a bare filename, got '{name}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_layout_resolves_to_defaults() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.resolve(), CoreFileNames::default());
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn partial_override() {
        let layout = LayoutConfig {
            compose: Some("compose.yaml".to_string()),
            ..Default::default()
        };
        let names = layout.resolve();
        assert_eq!(names.compose, "compose.yaml");
        assert_eq!(names.metadata, "metadata.yml");
    }

    #[test]
    fn rejects_separators() {
        let layout = LayoutConfig {
            metadata: Some("dir/metadata.yml".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            layout.validate(),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn rejects_empty() {
        let layout = LayoutConfig {
            parameters: Some(String::new()),
            ..Default::default()
        };
        assert!(layout.validate().is_err());
    }

    #[test]
    fn rejects_collision_with_default() {
        let layout = LayoutConfig {
            parameters: Some("metadata.yml".to_string()),
            ..Default::default()
        };
        let err = layout.validate().unwrap_err();
        assert!(err.to_string().contains("distinct"));
    }
}
