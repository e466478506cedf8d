use srl_ledger::{LedgerError, PreconditionFault};
use srl_reveal::RevealError;
use srl_types::RecordId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    /// The user cancelled a write or declined a signature.
    #[error("cancelled by user")]
    UserRejected,

    #[error("precondition failed: {0}")]
    Precondition(PreconditionFault),

    #[error("record not found: {0}")]
    RecordNotFound(RecordId),

    #[error("a reveal of {0} is already in progress")]
    RevealPending(RecordId),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("codec error: {0}")]
    Codec(#[from] srl_crypto::CodecError),

    #[error("store error: {0}")]
    Store(#[from] srl_store::StoreError),

    #[error("ledger error: {0}")]
    Ledger(LedgerError),

    #[error("sync error: {0}")]
    Sync(#[from] srl_sync::SyncError),

    #[error("reveal error: {0}")]
    Reveal(RevealError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SdkError {
    /// Returns `true` if the user cancelled the operation. Callers should
    /// treat this as a normal outcome rather than a failure.
    pub fn is_user_rejected(&self) -> bool {
        matches!(self, Self::UserRejected)
    }

    /// Message suitable for the status banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::UserRejected => "Operation interrupted by the author".to_string(),
            other => format!("Operation failed: {other}"),
        }
    }
}

impl From<PreconditionFault> for SdkError {
    fn from(fault: PreconditionFault) -> Self {
        Self::Precondition(fault)
    }
}

impl From<LedgerError> for SdkError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::UserRejected { .. } => Self::UserRejected,
            LedgerError::Precondition(fault) => Self::Precondition(fault),
            other => Self::Ledger(other),
        }
    }
}

impl From<RevealError> for SdkError {
    fn from(err: RevealError) -> Self {
        match err {
            RevealError::UserRejected => Self::UserRejected,
            RevealError::Disconnected => Self::Precondition(PreconditionFault::Disconnected),
            other => Self::Reveal(other),
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
