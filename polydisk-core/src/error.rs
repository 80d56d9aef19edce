//! Error types for polydisk

use std::io;
use thiserror::Error;

/// Result type alias
pub type DiskResult<T> = Result<T, DiskError>;

/// Main error type
#[derive(Error, Debug)]
pub enum DiskError {
    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The object-store client refused or failed a call.
    #[error("Object store {operation} failed: {message}")]
    Client {
        operation: &'static str,
        message: String,
    },

    /// The client accepted a delete but did not report anything as removed.
    #[error("Deletion not confirmed: {0}")]
    NotConfirmed(String),

    #[error("Disk not found: {0}")]
    DiskNotFound(String),

    #[error("No default disk registered")]
    NoDefaultDisk,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl DiskError {
    /// Map an I/O error raised while touching `path`, keeping the path for
    /// the not-found and permission kinds.
    pub fn from_io(err: io::Error, path: impl Into<String>) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => DiskError::NotFound(path.into()),
            io::ErrorKind::PermissionDenied => DiskError::PermissionDenied(path.into()),
            _ => DiskError::Io(err),
        }
    }

    pub fn client(operation: &'static str, message: impl Into<String>) -> Self {
        DiskError::Client {
            operation,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            DiskError::NotFound(_) => true,
            DiskError::Io(e) => e.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        match self {
            DiskError::PermissionDenied(_) => true,
            DiskError::Io(e) => e.kind() == io::ErrorKind::PermissionDenied,
            _ => false,
        }
    }
}
