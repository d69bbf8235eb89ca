use thiserror::Error;

/// Errors that can occur during asset storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The asset key is malformed or escapes the store root.
    #[error("invalid asset key: {0}")]
    InvalidKey(String),
    /// An I/O error occurred.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
}
