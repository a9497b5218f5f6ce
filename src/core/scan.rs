//! core::scan
//!
//! Attachment discovery under an application root.
//!
//! # Classification
//!
//! Two rules apply, and they are deliberately separate:
//! - A file *at the scan root* whose name is reserved (see
//!   [`CoreFileNames`]) is a core document and is excluded
//! - Every other regular file, including reserved names inside nested
//!   directories, is an attachment
//!
//! # Ordering
//!
//! Attachments are sorted by their full slash-separated relative path,
//! byte-wise. Nested files interleave with root files by string
//! comparison, not by directory grouping:
//!
//! ```text
//! a.cfg
//! b.cfg
//! nesteddirectory/a.cfg
//! ```
//!
//! # Invariants
//!
//! - Never mutates the filesystem
//! - Any I/O error aborts the whole scan; partial results are discarded
//! - Symlinks to files are attachments sized by their target; symlinks to
//!   directories are not descended into

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::layout::CoreFileNames;
use crate::core::types::{Attachment, AttachmentPath, TypeError};

/// Errors from attachment scanning.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to scan '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("attachment path is not valid UTF-8: '{}'", .path.display())]
    NonUtf8Path { path: PathBuf },

    #[error(transparent)]
    InvalidPath(#[from] TypeError),
}

impl ScanError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        ScanError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Scan `root` and return its attachments in canonical order.
///
/// # Errors
///
/// Returns an error if any directory cannot be listed, any entry cannot be
/// inspected (including broken symlinks), or a relative path is not UTF-8.
///
/// # Example
///
/// ```
/// use appdef::core::layout::CoreFileNames;
/// use appdef::core::scan::scan_attachments;
///
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("metadata.yml"), "name: x").unwrap();
/// std::fs::write(dir.path().join("config.cfg"), "something").unwrap();
///
/// let attachments = scan_attachments(dir.path(), &CoreFileNames::default()).unwrap();
/// assert_eq!(attachments.len(), 1);
/// assert_eq!(attachments[0].path(), "config.cfg");
/// assert_eq!(attachments[0].size(), 9);
/// ```
pub fn scan_attachments(root: &Path, names: &CoreFileNames) -> Result<Vec<Attachment>, ScanError> {
    let mut found = BTreeMap::new();
    walk(root, root, names, &mut found)?;

    tracing::debug!(root = %root.display(), count = found.len(), "scanned attachments");

    Ok(found
        .into_iter()
        .map(|(path, size)| Attachment::new(path, size))
        .collect())
}

fn walk(
    root: &Path,
    dir: &Path,
    names: &CoreFileNames,
    found: &mut BTreeMap<AttachmentPath, u64>,
) -> Result<(), ScanError> {
    let at_root = dir == root;
    let entries = fs::read_dir(dir).map_err(|e| ScanError::io(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| ScanError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| ScanError::io(&path, e))?;

        if file_type.is_dir() {
            walk(root, &path, names, found)?;
            continue;
        }

        // Resolves symlinks; a dangling link fails here.
        let metadata = fs::metadata(&path).map_err(|e| ScanError::io(&path, e))?;
        if !metadata.is_file() {
            tracing::trace!(path = %path.display(), "skipping non-regular entry");
            continue;
        }

        if at_root {
            if let Some(name) = entry.file_name().to_str() {
                if names.is_core(name) {
                    continue;
                }
            }
        }

        let relative = path.strip_prefix(root).unwrap_or(&path);
        let attachment_path = AttachmentPath::from_relative(relative)?.ok_or_else(|| {
            ScanError::NonUtf8Path {
                path: path.clone(),
            }
        })?;

        tracing::trace!(path = %attachment_path, size = metadata.len(), "found attachment");
        found.insert(attachment_path, metadata.len());
    }

    Ok(())
}
