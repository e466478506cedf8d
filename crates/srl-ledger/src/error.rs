use srl_store::StoreError;
use srl_types::{Address, RecordId, Status};

/// A client-side guard refused an operation before anything was written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionFault {
    #[error("record {id} is {status}; only Prepared records can transition")]
    NotPrepared { id: RecordId, status: Status },

    #[error("record {id} cannot transition to {target}")]
    InvalidTarget { id: RecordId, target: Status },

    #[error("{caller} is not the author of record {id} (author {author})")]
    NotAuthor {
        id: RecordId,
        author: Address,
        caller: Address,
    },

    #[error("wallet is not connected")]
    Disconnected,

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors produced by ledger protocol operations.
///
/// A missing key is never an error (reads return `None` / an empty list).
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The stored value under `key` is not valid for its slot.
    #[error("malformed value at {key}: {reason}")]
    Parse { key: String, reason: String },

    /// The ledger could not be read.
    #[error("read of {key} failed: {source}")]
    Read {
        key: String,
        #[source]
        source: StoreError,
    },

    /// The ledger refused or failed a write.
    #[error("write of {key} failed: {source}")]
    Write {
        key: String,
        #[source]
        source: StoreError,
    },

    /// The user cancelled the write at the wallet/transaction prompt.
    #[error("write of {key} cancelled by user")]
    UserRejected { key: String },

    /// A client-side guard refused the operation.
    #[error("precondition failed: {0}")]
    Precondition(#[from] PreconditionFault),

    /// A conditional write kept losing to concurrent writers.
    #[error("gave up updating {key} after {attempts} conflicting attempts")]
    Contention { key: String, attempts: u32 },
}

impl LedgerError {
    pub(crate) fn read(key: &str, source: StoreError) -> Self {
        Self::Read {
            key: key.to_string(),
            source,
        }
    }

    pub(crate) fn write(key: &str, source: StoreError) -> Self {
        if source.is_user_rejected() {
            Self::UserRejected {
                key: key.to_string(),
            }
        } else {
            Self::Write {
                key: key.to_string(),
                source,
            }
        }
    }

    pub(crate) fn parse(key: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if the user cancelled the operation.
    pub fn is_user_rejected(&self) -> bool {
        matches!(self, Self::UserRejected { .. })
    }

    /// Returns `true` if a bounded ledger call ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Read { source: StoreError::Timeout { .. }, .. }
                | Self::Write { source: StoreError::Timeout { .. }, .. }
        )
    }
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
