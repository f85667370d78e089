//! Quote store errors
//!
//! User-facing failures of store operations. Storage decode failures and
//! network failures never show up here; those degrade to defaults or to an
//! empty fetch.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by `QuoteStore` operations
#[derive(Error, Debug)]
pub enum QuoteError {
    /// Quote text or category was empty after trimming
    #[error("Please enter both a quote and a category.")]
    EmptyField,

    /// Imported content parsed but was not a JSON array
    #[error("Invalid JSON format: expected an array of quotes")]
    ImportFormat,

    /// Imported content could not be parsed at all
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Reading an import file or writing an export file failed
    #[error("Failed to access '{path}': {source}")]
    File {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Persisting the store failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl QuoteError {
    /// Whether the failure was caused by user input rather than the environment
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            QuoteError::EmptyField | QuoteError::ImportFormat | QuoteError::InvalidJson(_)
        )
    }
}

/// Result type for quote store operations
pub type QuoteResult<T> = Result<T, QuoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors() {
        assert!(QuoteError::EmptyField.is_user_error());
        assert!(QuoteError::ImportFormat.is_user_error());

        let storage = QuoteError::Storage(StorageError::Backend("locked".to_string()));
        assert!(!storage.is_user_error());
    }

    #[test]
    fn test_import_format_display() {
        let msg = QuoteError::ImportFormat.to_string();
        assert!(msg.contains("Invalid JSON format"));
    }
}
