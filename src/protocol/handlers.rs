//! Route handlers
//!
//! One handler per route. Each performs its own method check before reading
//! the query, so a wrong method always gets the handler's 405 message.

use std::time::Instant;

use axum::body::Body;
use axum::extract::{RawQuery, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use log::info;

use crate::error::ServerError;
use crate::error::handlers::reject;
use crate::protocol::AppState;
use crate::protocol::params::{
    FileQuery, GenerateQuery, parse_size_mb, require_filename, require_method, size_mb_to_bytes,
};
use crate::protocol::responses::{OCTET_STREAM, attachment_headers};
use crate::storage::filesystem::probe_content_type;
use crate::storage::{prepare_file_retrieval, prepare_file_storage};
use crate::transfer::{RandomPayload, TransferLog, open_file_stream, receive_to_file};
use crate::utils::{format_bytes, throughput_mb_per_sec};

/// `POST /upload?filename=<name>`: stores the raw request body.
pub async fn upload(
    State(state): State<AppState>,
    method: Method,
    RawQuery(raw): RawQuery,
    body: Body,
) -> Response {
    match store_upload(&state, &method, raw.as_deref(), body).await {
        Ok(resp) => resp,
        Err(e) => reject("[UPLOAD]", e),
    }
}

async fn store_upload(
    state: &AppState,
    method: &Method,
    raw: Option<&str>,
    body: Body,
) -> Result<Response, ServerError> {
    require_method(method, Method::POST)?;
    let query = FileQuery::from_raw(raw);
    let filename = require_filename(&query)?;
    let target = prepare_file_storage(&state.storage, filename)?;

    info!(
        "[UPLOAD] Starting upload of '{}' to {}",
        target.file_name,
        target.file_path.display()
    );
    let started = Instant::now();

    let bytes_written = receive_to_file(body, &target.file_path).await?;

    let elapsed = started.elapsed();
    info!(
        "[UPLOAD] Completed '{}': {} in {}ms ({:.2} MB/s)",
        target.file_name,
        format_bytes(bytes_written),
        elapsed.as_millis(),
        throughput_mb_per_sec(bytes_written, elapsed)
    );

    Ok((
        StatusCode::OK,
        format!("Uploaded {} ({} bytes)", target.file_name, bytes_written),
    )
        .into_response())
}

/// `GET /download?filename=<name>`: streams a stored file back.
pub async fn download(
    State(state): State<AppState>,
    method: Method,
    RawQuery(raw): RawQuery,
) -> Response {
    match serve_download(&state, &method, raw.as_deref()).await {
        Ok(resp) => resp,
        Err(e) => reject("[DOWNLOAD]", e),
    }
}

async fn serve_download(
    state: &AppState,
    method: &Method,
    raw: Option<&str>,
) -> Result<Response, ServerError> {
    require_method(method, Method::GET)?;
    let query = FileQuery::from_raw(raw);
    let filename = require_filename(&query)?;
    let file = prepare_file_retrieval(&state.storage, filename).await?;

    info!(
        "[DOWNLOAD] Starting download of '{}' ({})",
        file.file_name,
        format_bytes(file.size)
    );

    let stream = open_file_stream(&file.file_path).await?;
    let headers = attachment_headers(
        &probe_content_type(&file.file_path),
        file.size,
        &file.file_name,
    );
    let body = Body::from_stream(TransferLog::new(
        stream,
        "[DOWNLOAD]",
        format!("'{}'", file.file_name),
        file.size,
    ));

    Ok((StatusCode::OK, headers, body).into_response())
}

/// `GET /generate?sizeMB=<n>`: streams `n` MiB of pseudo-random bytes.
pub async fn generate(method: Method, RawQuery(raw): RawQuery) -> Response {
    match stream_generated(&method, raw.as_deref()) {
        Ok(resp) => resp,
        Err(e) => reject("[GENERATE]", e),
    }
}

fn stream_generated(method: &Method, raw: Option<&str>) -> Result<Response, ServerError> {
    require_method(method, Method::GET)?;
    let query = GenerateQuery::from_raw(raw);
    let size_mb = parse_size_mb(&query)?;
    let total_bytes = size_mb_to_bytes(size_mb);

    info!(
        "[GENERATE] Starting generation of {} MB ({})",
        size_mb,
        format_bytes(total_bytes)
    );

    let headers = attachment_headers(
        OCTET_STREAM,
        total_bytes,
        &format!("generated-{}MB.bin", size_mb),
    );
    let body = Body::from_stream(
        TransferLog::new(
            RandomPayload::new(total_bytes),
            "[GENERATE]",
            format!("{} MB", size_mb),
            total_bytes,
        )
        .with_progress(),
    );

    Ok((StatusCode::OK, headers, body).into_response())
}
