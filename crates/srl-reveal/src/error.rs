use std::time::Duration;

use srl_crypto::{CodecError, WalletError};

/// Errors that can end a reveal.
#[derive(Debug, thiserror::Error)]
pub enum RevealError {
    /// No wallet account is connected; nothing was requested.
    #[error("wallet is not connected")]
    Disconnected,

    /// The wallet did not answer in time.
    #[error("signature request timed out after {0:?}")]
    Timeout(Duration),

    /// The user declined to sign.
    #[error("signature request rejected by user")]
    UserRejected,

    /// The wallet failed for another reason.
    #[error("wallet error: {0}")]
    Wallet(WalletError),

    /// The stored value could not be decoded.
    #[error("decode error: {0}")]
    Codec(#[from] CodecError),
}

impl RevealError {
    pub fn is_user_rejected(&self) -> bool {
        matches!(self, Self::UserRejected)
    }
}

impl From<WalletError> for RevealError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::UserRejected => Self::UserRejected,
            WalletError::Disconnected => Self::Disconnected,
            other => Self::Wallet(other),
        }
    }
}
