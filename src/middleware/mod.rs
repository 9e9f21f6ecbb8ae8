//! Middleware components
//!
//! Request processing layers applied to every route.

pub mod logging;
