//! Error types
//!
//! Defines domain-specific error types for each module of the streaming server.

use std::fmt;
use std::io;
use std::net::SocketAddr;

/// Request validation errors (method and query parameters)
#[derive(Debug)]
pub enum RequestError {
    MethodNotAllowed(&'static str),
    MissingParameter(&'static str),
    InvalidInteger { name: &'static str, value: String },
    OutOfRange { name: &'static str, min: i32, max: i32, value: i32 },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::MethodNotAllowed(m) => write!(f, "Method not allowed, expected {}", m),
            RequestError::MissingParameter(p) => write!(f, "Missing query parameter: {}", p),
            RequestError::InvalidInteger { name, value } => {
                write!(f, "Invalid integer for {}: {}", name, value)
            }
            RequestError::OutOfRange { name, min, max, value } => {
                write!(f, "{} out of range [{}, {}]: {}", name, min, max, value)
            }
        }
    }
}

impl std::error::Error for RequestError {}

/// Storage module errors
#[derive(Debug)]
pub enum StorageError {
    InvalidFilename(String),
    PathTraversal(String),
    FileNotFound(String),
    NotAFile(String),
    IoError(io::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::InvalidFilename(n) => write!(f, "Invalid filename: {}", n),
            StorageError::PathTraversal(p) => write!(f, "Path traversal attempt: {}", p),
            StorageError::FileNotFound(p) => write!(f, "File not found: {}", p),
            StorageError::NotAFile(p) => write!(f, "Not a regular file: {}", p),
            StorageError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<io::Error> for StorageError {
    fn from(error: io::Error) -> Self {
        StorageError::IoError(error)
    }
}

/// Transfer module errors
#[derive(Debug)]
pub enum TransferError {
    OpenFailed(io::Error),
    ReceiveFailed(io::Error),
    WriteFailed(io::Error),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::OpenFailed(e) => write!(f, "Failed to open file: {}", e),
            TransferError::ReceiveFailed(e) => write!(f, "Failed to read request body: {}", e),
            TransferError::WriteFailed(e) => write!(f, "Failed to write file: {}", e),
        }
    }
}

impl std::error::Error for TransferError {}

/// General server error that encompasses all error types
#[derive(Debug)]
pub enum ServerError {
    Request(RequestError),
    Storage(StorageError),
    Transfer(TransferError),
    BindFailed(SocketAddr, io::Error),
    InvalidAddress(String),
    IoError(io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Request(e) => write!(f, "Request error: {}", e),
            ServerError::Storage(e) => write!(f, "Storage error: {}", e),
            ServerError::Transfer(e) => write!(f, "Transfer error: {}", e),
            ServerError::BindFailed(addr, e) => write!(f, "Failed to bind to {}: {}", addr, e),
            ServerError::InvalidAddress(a) => write!(f, "Invalid bind address: {}", a),
            ServerError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<RequestError> for ServerError {
    fn from(error: RequestError) -> Self {
        ServerError::Request(error)
    }
}

impl From<StorageError> for ServerError {
    fn from(error: StorageError) -> Self {
        ServerError::Storage(error)
    }
}

impl From<TransferError> for ServerError {
    fn from(error: TransferError) -> Self {
        ServerError::Transfer(error)
    }
}

impl From<io::Error> for ServerError {
    fn from(error: io::Error) -> Self {
        ServerError::IoError(error)
    }
}
