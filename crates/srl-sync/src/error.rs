use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("unknown status filter: {0:?} (expected all, prepared, cast or failed)")]
    UnknownFacet(String),

    #[error("ledger error: {0}")]
    Ledger(#[from] srl_ledger::LedgerError),
}

pub type SyncResult<T> = Result<T, SyncError>;
