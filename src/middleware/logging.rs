//! Logging middleware
//!
//! Provides request logging functionality.

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::Response;
use log::info;

/// Peer address of the request, or `unknown` when the connection did not
/// record one.
pub fn client_label(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Log each request and the status it was answered with
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client = client_label(&request);
    let started = Instant::now();

    info!("Request {} {} from {}", method, path, client);

    let response = next.run(request).await;

    info!(
        "Response {} {} to {}: {} ({}ms)",
        method,
        path,
        client,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );

    response
}
