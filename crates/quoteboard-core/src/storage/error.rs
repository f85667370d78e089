//! Storage error handling
//!
//! Failures opening or writing the quote database are classified by cause so
//! the CLI can tell the user what to do about them.

use std::io;
use std::path::{Path, PathBuf};

use rusqlite::ErrorCode;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to create the data directory
    #[error("Failed to create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The database or its directory is not writable
    #[error("Permission denied: cannot write to '{path}'")]
    PermissionDenied { path: PathBuf },

    /// No room left to write the database
    #[error("Disk full while writing to '{path}'")]
    DiskFull { path: PathBuf },

    /// Another process holds a lock on the database
    #[error("Quote database '{path}' is locked by another process")]
    Locked { path: PathBuf },

    /// Any other SQLite failure
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Value could not be encoded for storage
    #[error("Failed to encode value: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing store is unusable (poisoned lock, closed handle)
    #[error("Storage backend unavailable: {0}")]
    Backend(String),
}

impl StorageError {
    /// Classify a filesystem error hit while preparing `path`
    pub fn from_io(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied { path },
            _ => StorageError::CreateDirectory {
                path,
                source: error,
            },
        }
    }

    /// Classify a SQLite error hit while opening or writing `path`
    pub fn from_sqlite(error: rusqlite::Error, path: &Path) -> Self {
        let path = path.to_path_buf();
        match error.sqlite_error_code() {
            Some(ErrorCode::PermissionDenied | ErrorCode::ReadOnly) => {
                debug!("{:?} is not writable: {}", path, error);
                StorageError::PermissionDenied { path }
            }
            Some(ErrorCode::DiskFull) => {
                debug!("No space left for {:?}: {}", path, error);
                StorageError::DiskFull { path }
            }
            Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => {
                debug!("{:?} is locked: {}", path, error);
                StorageError::Locked { path }
            }
            _ => StorageError::Database(error),
        }
    }

    /// What the user can do about this error, if anything
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::CreateDirectory { .. } => {
                Some("Check that the parent directory exists, or set data_dir with `quoteboard config set data_dir <path>`.")
            }
            StorageError::PermissionDenied { .. } => Some(
                "Check file and directory permissions, or point data_dir somewhere writable.",
            ),
            StorageError::DiskFull { .. } => Some("Free up disk space and try again."),
            StorageError::Locked { .. } => {
                Some("Another quoteboard process (e.g. `quoteboard watch`) is writing. Try again.")
            }
            _ => None,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
