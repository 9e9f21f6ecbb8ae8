//! Query parameter parsing
//!
//! Handlers receive the raw query string so the method check can run before
//! any parameter is looked at. Lookups are first-wins and ignore pairs that
//! carry no `=`.

use axum::http::Method;

use crate::error::RequestError;

pub const MIN_GENERATE_MB: i32 = 1;
pub const MAX_GENERATE_MB: i32 = 10_000;

/// Query for `/upload` and `/download`
#[derive(Debug, Default)]
pub struct FileQuery {
    pub filename: Option<String>,
}

impl FileQuery {
    pub fn from_raw(raw: Option<&str>) -> Self {
        Self {
            filename: query_param(raw, "filename"),
        }
    }
}

/// Query for `/generate`
#[derive(Debug, Default)]
pub struct GenerateQuery {
    pub size_mb: Option<String>,
}

impl GenerateQuery {
    pub fn from_raw(raw: Option<&str>) -> Self {
        Self {
            size_mb: query_param(raw, "sizeMB"),
        }
    }
}

/// Returns the URL-decoded value of the first `key=value` pair named `key`.
pub fn query_param(raw: Option<&str>, key: &str) -> Option<String> {
    raw?.split('&')
        .filter(|pair| pair.contains('='))
        .filter_map(|pair| form_urlencoded::parse(pair.as_bytes()).next())
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.into_owned())
}

pub fn require_method(actual: &Method, expected: Method) -> Result<(), RequestError> {
    if *actual == expected {
        Ok(())
    } else {
        Err(RequestError::MethodNotAllowed(expected_name(&expected)))
    }
}

fn expected_name(method: &Method) -> &'static str {
    if *method == Method::POST {
        "POST"
    } else {
        "GET"
    }
}

/// Returns the filename, rejecting missing and whitespace-only values.
pub fn require_filename(query: &FileQuery) -> Result<&str, RequestError> {
    match query.filename.as_deref() {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(RequestError::MissingParameter("filename")),
    }
}

/// Parses `sizeMB` as a 32-bit integer within the allowed range.
pub fn parse_size_mb(query: &GenerateQuery) -> Result<i32, RequestError> {
    let raw = query
        .size_mb
        .as_deref()
        .ok_or(RequestError::MissingParameter("sizeMB"))?;

    let size_mb: i32 = raw.parse().map_err(|_| RequestError::InvalidInteger {
        name: "sizeMB",
        value: raw.to_string(),
    })?;

    if !(MIN_GENERATE_MB..=MAX_GENERATE_MB).contains(&size_mb) {
        return Err(RequestError::OutOfRange {
            name: "sizeMB",
            min: MIN_GENERATE_MB,
            max: MAX_GENERATE_MB,
            value: size_mb,
        });
    }

    Ok(size_mb)
}

/// Total payload size for a validated `sizeMB`
pub fn size_mb_to_bytes(size_mb: i32) -> u64 {
    size_mb as u64 * 1024 * 1024
}
