//! Record store error types.

use thiserror::Error;

/// Errors raised by the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to open or read the store file. A missing file is not a read
    /// error; this covers permission problems and malformed contents.
    #[error("failed to read record store: {0}")]
    Read(String),

    /// Failed to append rows (disk full, permissions, medium unwritable).
    #[error("failed to write record store: {0}")]
    Write(String),

    /// I/O error during store operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
