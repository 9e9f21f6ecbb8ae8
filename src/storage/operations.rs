//! Storage operations
//!
//! Resolves upload and download filenames to paths inside the Storage Root.

use log::{info, warn};
use tokio::fs;

use crate::error::StorageError;
use crate::storage::filesystem::StorageRoot;
use crate::storage::results::{RetrieveResult, StoreResult};
use crate::storage::validation::{resolve_within_root, sanitize_filename};

/// Prepares for file storage
///
/// The client filename is reduced to its base name before resolution, so an
/// upload can only ever land directly inside the Storage Root.
pub fn prepare_file_storage(root: &StorageRoot, filename: &str) -> Result<StoreResult, StorageError> {
    let file_name = sanitize_filename(filename)?;

    let file_path = resolve_within_root(root.path(), &file_name)
        .ok_or_else(|| StorageError::PathTraversal(filename.to_string()))?;

    info!(
        "Prepared file storage for {} (real: {})",
        file_name,
        file_path.display()
    );

    Ok(StoreResult {
        file_path,
        file_name,
    })
}

/// Prepares for file retrieval
///
/// Anything that does not resolve to a regular file inside the Storage Root is
/// reported as not found.
pub async fn prepare_file_retrieval(
    root: &StorageRoot,
    filename: &str,
) -> Result<RetrieveResult, StorageError> {
    let file_path = match resolve_within_root(root.path(), filename) {
        Some(path) => path,
        None => {
            warn!("Retrieval outside storage root refused: {}", filename);
            return Err(StorageError::FileNotFound(filename.to_string()));
        }
    };

    // any stat failure (missing, ENOTDIR, name too long, ...) counts as absent
    let metadata = match fs::metadata(&file_path).await {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!("Cannot stat {}: {}", file_path.display(), e);
            return Err(StorageError::FileNotFound(filename.to_string()));
        }
    };

    if !metadata.is_file() {
        return Err(StorageError::NotAFile(filename.to_string()));
    }

    let file_name = file_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());

    info!(
        "Prepared file retrieval for {} (real: {}, {} bytes)",
        filename,
        file_path.display(),
        metadata.len()
    );

    Ok(RetrieveResult {
        file_path,
        file_name,
        size: metadata.len(),
    })
}
