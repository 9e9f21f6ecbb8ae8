//! HTTP protocol layer
//!
//! The routing table and the handlers behind it.
//!
//! | Path | Method | Description |
//! |---|---|---|
//! | `/upload?filename=<name>` | POST | Store the raw request body |
//! | `/download?filename=<name>` | GET | Stream a stored file |
//! | `/generate?sizeMB=<n>` | GET | Stream `n` MiB of random bytes |

pub mod handlers;
pub mod params;
pub mod responses;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::any;

use crate::middleware::logging::log_request;
use crate::storage::StorageRoot;

/// Shared state for route handlers.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<StorageRoot>,
}

/// Build the routing table.
pub fn build_router(storage: Arc<StorageRoot>) -> Router {
    let state = AppState { storage };

    Router::new()
        .route("/upload", any(handlers::upload))
        .route("/download", any(handlers::download))
        .route("/generate", any(handlers::generate))
        .layer(DefaultBodyLimit::disable())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
