//! Path validation
//!
//! Filename sanitization and the Storage Root containment check.

use std::path::{Component, Path, PathBuf};

use crate::error::StorageError;

/// Reduces a client-supplied filename to its base name.
///
/// Any `..` component is rejected outright; other directory components are
/// stripped. Names with no base component left (`.`, `/`) are invalid.
pub fn sanitize_filename(raw: &str) -> Result<String, StorageError> {
    let path = Path::new(raw);

    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(StorageError::PathTraversal(raw.to_string()));
    }

    path.file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| StorageError::InvalidFilename(raw.to_string()))
}

/// Normalizes a path without touching the filesystem.
///
/// `.` components are dropped and `..` pops the previous component.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Resolves `relative` against `root` and returns it only if the normalized
/// result is still inside `root`.
///
/// `root` must already be absolute and normalized.
pub fn resolve_within_root(root: &Path, relative: &str) -> Option<PathBuf> {
    let resolved = normalize_path(&root.join(relative));
    if resolved.starts_with(root) {
        Some(resolved)
    } else {
        None
    }
}
