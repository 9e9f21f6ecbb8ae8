//! Storage result types
//!
//! Defines result structures returned by storage operations.

use std::path::PathBuf;

/// Result of preparing a file download
#[derive(Debug, Clone)]
pub struct RetrieveResult {
    pub file_path: PathBuf,
    pub file_name: String,
    pub size: u64,
}

/// Result of preparing a file upload
#[derive(Debug, Clone)]
pub struct StoreResult {
    pub file_path: PathBuf,
    pub file_name: String,
}
