//! Utility functions
//!
//! Common helpers shared across modules.

pub mod format;

pub use format::{format_bytes, throughput_mb_per_sec};
