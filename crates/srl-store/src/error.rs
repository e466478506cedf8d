use std::time::Duration;

/// Errors from ledger store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The ledger cannot be reached or reports itself unavailable.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// The ledger refused a write.
    #[error("write rejected: {0}")]
    WriteRejected(String),

    /// The user declined the wallet/transaction prompt backing a write.
    #[error("write cancelled by user")]
    UserRejected,

    /// The operation did not complete within the configured bound.
    #[error("{op} timed out after {after:?}")]
    Timeout { op: &'static str, after: Duration },

    /// The backend does not implement an optional operation.
    #[error("operation not supported by this store: {0}")]
    Unsupported(&'static str),

    /// Serialization or deserialization failure of backend state.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal backend failure (e.g. a poisoned lock).
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns `true` if the user cancelled the operation.
    pub fn is_user_rejected(&self) -> bool {
        matches!(self, Self::UserRejected)
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
