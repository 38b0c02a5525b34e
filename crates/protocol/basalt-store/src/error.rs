//! Error types for the storage layer.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during storage operations.
///
/// An error from [`crate::NodeStore::open`] is fatal to the caller: the
/// daemon must not participate in consensus over a store it could not open,
/// and open failures are never retried.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error while preparing the store directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The store path has no parent directory to create.
    #[error("Path error: {0}")]
    Path(String),
}

impl StoreError {
    /// Create a path error.
    pub fn path(msg: impl Into<String>) -> Self {
        StoreError::Path(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let store_err: StoreError = io_err.into();
        assert!(matches!(store_err, StoreError::Io(_)));
    }

    #[test]
    fn test_path_error_display() {
        let err = StoreError::path("no parent");
        assert!(err.to_string().contains("no parent"));
    }
}
