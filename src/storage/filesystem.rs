//! File system operations
//!
//! Owns the Storage Root directory and filesystem probes used by the handlers.

use std::fs;
use std::io::Result;
use std::path::{Path, PathBuf};

use crate::storage::validation::normalize_path;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// The directory every stored file lives under.
#[derive(Debug, Clone)]
pub struct StorageRoot {
    path: PathBuf,
}

impl StorageRoot {
    /// Makes `path` absolute, normalizes it and creates the directory if missing.
    pub fn open(path: &Path) -> Result<Self> {
        let path = normalize_path(&std::path::absolute(path)?);
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Best-effort MIME type based on the file extension
pub fn probe_content_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}
