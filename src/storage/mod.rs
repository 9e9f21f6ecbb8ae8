//! File system storage management
//!
//! Handles the Storage Root, filename sanitization and path containment.

pub mod filesystem;
pub mod operations;
pub mod results;
pub mod validation;

pub use filesystem::StorageRoot;
pub use operations::{prepare_file_retrieval, prepare_file_storage};
pub use results::{RetrieveResult, StoreResult};
