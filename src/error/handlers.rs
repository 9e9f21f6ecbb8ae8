//! Error handlers
//!
//! Maps server errors to HTTP status codes and plain-text client messages.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};

use crate::error::types::{RequestError, ServerError, StorageError};

/// Log line for a failed request, prefixed with the route's tag.
pub fn rejection_message(tag: &str, err: &ServerError) -> String {
    if error_to_status(err).is_server_error() {
        format!("{} Failed: {}", tag, err)
    } else {
        format!("{} Rejected: {}", tag, err)
    }
}

/// Handle a server error
pub fn handle_error(tag: &str, err: &ServerError) {
    if error_to_status(err).is_server_error() {
        error!("{}", rejection_message(tag, err));
    } else {
        warn!("{}", rejection_message(tag, err));
    }
}

/// Logs `err` under `tag` and turns it into the client response.
pub fn reject(tag: &str, err: ServerError) -> Response {
    handle_error(tag, &err);
    (error_to_status(&err), client_message(&err)).into_response()
}

/// Convert error to HTTP status code
pub fn error_to_status(err: &ServerError) -> StatusCode {
    match err {
        ServerError::Request(RequestError::MethodNotAllowed(_)) => StatusCode::METHOD_NOT_ALLOWED,
        ServerError::Request(_) => StatusCode::BAD_REQUEST,
        ServerError::Storage(StorageError::InvalidFilename(_))
        | ServerError::Storage(StorageError::PathTraversal(_)) => StatusCode::BAD_REQUEST,
        ServerError::Storage(StorageError::FileNotFound(_))
        | ServerError::Storage(StorageError::NotAFile(_)) => StatusCode::NOT_FOUND,
        ServerError::Storage(StorageError::IoError(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        ServerError::Transfer(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ServerError::BindFailed(..) | ServerError::InvalidAddress(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        ServerError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Short message sent back to the client.
///
/// Internal failures never leak paths or OS error text.
pub fn client_message(err: &ServerError) -> String {
    match err {
        ServerError::Request(RequestError::MethodNotAllowed(method)) => {
            format!("Only {} allowed", method)
        }
        ServerError::Request(RequestError::MissingParameter(name)) => {
            format!("Missing {} query parameter", name)
        }
        ServerError::Request(RequestError::InvalidInteger { name, .. }) => {
            format!("{} must be a valid integer", name)
        }
        ServerError::Request(RequestError::OutOfRange { name, min, max, .. }) => {
            format!("{} must be between {} and {}", name, min, max)
        }
        ServerError::Storage(StorageError::InvalidFilename(_))
        | ServerError::Storage(StorageError::PathTraversal(_)) => "Invalid filename".to_string(),
        ServerError::Storage(StorageError::FileNotFound(_))
        | ServerError::Storage(StorageError::NotAFile(_)) => "File not found".to_string(),
        _ => "Internal server error".to_string(),
    }
}
