use std::sync::Arc;

use srl_crypto::{ValueCodec, Wallet, WalletSignature};
use srl_types::{Record, RecordId};
use tracing::{debug, info, warn};

use crate::config::RevealConfig;
use crate::error::RevealError;
use crate::session::SessionContext;

/// A decoded value together with the consent signature that unlocked it.
#[derive(Clone, Debug)]
pub struct Revealed {
    pub id: RecordId,
    pub value: f64,
    pub signature: WalletSignature,
}

/// Runs the reveal ceremony against a shared session.
///
/// The gate holds no per-record state; callers that must prevent two
/// overlapping reveals of one record track that themselves.
pub struct RevealGate {
    session: Arc<SessionContext>,
    config: RevealConfig,
}

impl RevealGate {
    pub fn new(session: Arc<SessionContext>, config: RevealConfig) -> Self {
        Self { session, config }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    /// Ask `wallet` to sign the session challenge, then decode `record`.
    ///
    /// Fails with [`RevealError::Disconnected`] before contacting the wallet
    /// when no account is connected. The signing request is abandoned after
    /// `sign_timeout`. The returned signature is not verified.
    pub async fn reveal<W>(&self, record: &Record, wallet: &W) -> Result<Revealed, RevealError>
    where
        W: Wallet + ?Sized,
    {
        let Some(account) = wallet.address().await else {
            return Err(RevealError::Disconnected);
        };
        debug!(id = %record.id, %account, "requesting reveal signature");

        let challenge = self.session.challenge();
        let signature =
            match tokio::time::timeout(self.config.sign_timeout, wallet.sign(&challenge)).await {
                Ok(Ok(signature)) => signature,
                Ok(Err(e)) => {
                    let err = RevealError::from(e);
                    if err.is_user_rejected() {
                        info!(id = %record.id, "reveal declined");
                    } else {
                        warn!(id = %record.id, error = %err, "reveal signature failed");
                    }
                    return Err(err);
                }
                Err(_) => {
                    warn!(id = %record.id, limit = ?self.config.sign_timeout, "reveal signature timed out");
                    return Err(RevealError::Timeout(self.config.sign_timeout));
                }
            };

        let value = ValueCodec::decode(&record.encoded_value)?;
        info!(id = %record.id, "value revealed");
        Ok(Revealed {
            id: record.id.clone(),
            value,
            signature,
        })
    }
}
