//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`AttachmentPath`] - Slash-separated path relative to an application root
//! - [`Attachment`] - A non-core file under the application root
//!
//! # Validation
//!
//! These types enforce validity at construction time. An attachment path
//! that escapes the root or uses host-specific separators cannot be
//! represented.
//!
//! # Examples
//!
//! ```
//! use appdef::core::types::{Attachment, AttachmentPath};
//!
//! let path = AttachmentPath::new("nesteddirectory/config.cfg").unwrap();
//! let attachment = Attachment::new(path, 9);
//! assert_eq!(attachment.path(), "nesteddirectory/config.cfg");
//! assert_eq!(attachment.size(), 9);
//!
//! assert!(AttachmentPath::new("../outside").is_err());
//! assert!(AttachmentPath::new("/absolute").is_err());
//! ```

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid attachment path '{path}': {reason}")]
    InvalidAttachmentPath { path: String, reason: String },
}

impl TypeError {
    fn attachment_path(path: &str, reason: &str) -> Self {
        TypeError::InvalidAttachmentPath {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// A validated attachment path.
///
/// Attachment paths are relative to the application root and always use
/// `/` as the separator, whatever the host convention:
/// - Cannot be empty
/// - Cannot start or end with `/`
/// - Cannot contain `\`, empty components, `.` or `..`
///
/// Ordering is byte-wise on the full string, so `b.cfg` sorts before
/// `nested/a.cfg` even though the latter is deeper.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AttachmentPath(String);

impl AttachmentPath {
    /// Create a new validated attachment path.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidAttachmentPath` if the path is not a
    /// normalized slash-separated relative path.
    pub fn new(path: impl Into<String>) -> Result<Self, TypeError> {
        let path = path.into();
        Self::validate(&path)?;
        Ok(Self(path))
    }

    /// Build an attachment path from a host path relative to the root.
    ///
    /// Returns `Ok(None)` when a component is not valid UTF-8, leaving the
    /// caller to decide how to report it.
    pub fn from_relative(relative: &Path) -> Result<Option<Self>, TypeError> {
        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => match part.to_str() {
                    Some(part) => parts.push(part),
                    None => return Ok(None),
                },
                _ => {
                    return Err(TypeError::attachment_path(
                        &relative.to_string_lossy(),
                        "path must be relative to the application root",
                    ))
                }
            }
        }
        Self::new(parts.join("/")).map(Some)
    }

    fn validate(path: &str) -> Result<(), TypeError> {
        if path.is_empty() {
            return Err(TypeError::attachment_path(path, "path cannot be empty"));
        }
        if path.contains('\\') {
            return Err(TypeError::attachment_path(path, "path cannot contain '\\'"));
        }
        if path.starts_with('/') {
            return Err(TypeError::attachment_path(path, "path cannot be absolute"));
        }
        for component in path.split('/') {
            match component {
                "" => {
                    return Err(TypeError::attachment_path(
                        path,
                        "path cannot contain empty components",
                    ))
                }
                "." | ".." => {
                    return Err(TypeError::attachment_path(
                        path,
                        "path cannot contain '.' or '..' components",
                    ))
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Get the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AttachmentPath {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<AttachmentPath> for String {
    fn from(path: AttachmentPath) -> Self {
        path.0
    }
}

impl AsRef<str> for AttachmentPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AttachmentPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A file under the application root that is not a root-level core document.
///
/// Attachments order by path first, so a sorted `Vec<Attachment>` is in
/// the canonical attachment order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Attachment {
    path: AttachmentPath,
    size: u64,
}

impl Attachment {
    /// Create an attachment record.
    pub fn new(path: AttachmentPath, size: u64) -> Self {
        Self { path, size }
    }

    /// Slash-separated path relative to the application root.
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// The validated path.
    pub fn attachment_path(&self) -> &AttachmentPath {
        &self.path
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    mod attachment_path {
        use super::*;

        #[test]
        fn valid_paths() {
            assert!(AttachmentPath::new("config.cfg").is_ok());
            assert!(AttachmentPath::new("nested/dir/config.cfg").is_ok());
            assert!(AttachmentPath::new(".hidden").is_ok());
            assert!(AttachmentPath::new("dir/..data").is_ok());
        }

        #[test]
        fn invalid_paths() {
            assert!(AttachmentPath::new("").is_err());
            assert!(AttachmentPath::new("/etc/passwd").is_err());
            assert!(AttachmentPath::new("dir/").is_err());
            assert!(AttachmentPath::new("a//b").is_err());
            assert!(AttachmentPath::new("a/./b").is_err());
            assert!(AttachmentPath::new("../b").is_err());
            assert!(AttachmentPath::new("a\\b").is_err());
        }

        #[test]
        fn from_relative_joins_with_slash() {
            let rel: PathBuf = ["nested", "deeper", "file.txt"].iter().collect();
            let path = AttachmentPath::from_relative(&rel).unwrap().unwrap();
            assert_eq!(path.as_str(), "nested/deeper/file.txt");
        }

        #[test]
        fn from_relative_rejects_parent() {
            assert!(AttachmentPath::from_relative(Path::new("../x")).is_err());
        }

        #[test]
        fn ordering_is_bytewise() {
            let mut paths = vec![
                AttachmentPath::new("nesteddirectory/a.cfg").unwrap(),
                AttachmentPath::new("b.cfg").unwrap(),
                AttachmentPath::new("a.cfg").unwrap(),
                AttachmentPath::new("B.cfg").unwrap(),
            ];
            paths.sort();
            let sorted: Vec<_> = paths.iter().map(|p| p.as_str()).collect();
            assert_eq!(
                sorted,
                vec!["B.cfg", "a.cfg", "b.cfg", "nesteddirectory/a.cfg"]
            );
        }

        #[test]
        fn serde_rejects_invalid() {
            let result: Result<AttachmentPath, _> = serde_json::from_str("\"../x\"");
            assert!(result.is_err());
        }
    }

    mod attachment {
        use super::*;

        #[test]
        fn accessors() {
            let attachment = Attachment::new(AttachmentPath::new("a.cfg").unwrap(), 9);
            assert_eq!(attachment.path(), "a.cfg");
            assert_eq!(attachment.size(), 9);
        }

        #[test]
        fn orders_by_path_first() {
            let big = Attachment::new(AttachmentPath::new("a.cfg").unwrap(), 100);
            let small = Attachment::new(AttachmentPath::new("b.cfg").unwrap(), 1);
            assert!(big < small);
        }
    }
}
