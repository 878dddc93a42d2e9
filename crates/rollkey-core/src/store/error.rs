//! Settings store error types.

use thiserror::Error;

/// Errors that can occur during settings store operations.
///
/// A store error on a counter or identity write is a persistence failure
/// that must be surfaced, not swallowed: an unacknowledged counter write
/// risks counter reuse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// I/O error (file system, database, platform store).
    #[error("I/O error: {0}")]
    Io(String),

    /// A persisted value exists but cannot be interpreted.
    #[error("corrupt value for key {key}: {reason}")]
    Corrupt {
        /// Key whose value is corrupt.
        key: String,
        /// What failed while interpreting it.
        reason: String,
    },
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}
