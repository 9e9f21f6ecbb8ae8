//! Response header helpers

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue};

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Headers for a streamed attachment of known length.
///
/// A filename that cannot be carried in a header value falls back to a bare
/// `attachment` disposition.
pub fn attachment_headers(content_type: &str, length: u64, filename: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_str(content_type).unwrap_or(HeaderValue::from_static(OCTET_STREAM)),
    );
    headers.insert(CONTENT_LENGTH, HeaderValue::from(length));

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .unwrap_or(HeaderValue::from_static("attachment"));
    headers.insert(CONTENT_DISPOSITION, disposition);

    headers
}
