//! Server core functionality
//!
//! This module contains the server lifecycle (bind, start, stop) and its
//! configuration.

pub mod config;
pub mod core;

pub use config::ServerConfig;
pub use core::StreamingServer;
