//! Transfer module
//!
//! Bounded transfers between HTTP bodies, files and the random generator.

pub mod file_ops;
pub mod generator;
pub mod progress;

/// Every transfer moves data through a buffer of at most this size.
pub const TRANSFER_BUFFER_SIZE: usize = 64 * 1024;

pub use file_ops::{open_file_stream, receive_to_file};
pub use generator::RandomPayload;
pub use progress::TransferLog;
