use srl_crypto::SigningKey;
use srl_types::{ChainId, Timestamp};

const SECS_PER_DAY: u64 = 86_400;

/// Parameters shared by every reveal in one client session.
///
/// Built once when the client connects and read-only afterwards. The
/// public-key material comes from a freshly generated Ed25519 key whose
/// secret half is dropped immediately: it identifies the session, nothing
/// is ever encrypted to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionContext {
    pub public_key_material: String,
    pub store_address: String,
    pub chain_id: ChainId,
    pub started_at: Timestamp,
    pub validity_days: u32,
}

impl SessionContext {
    /// Start a session now with fresh key material.
    pub fn new(store_address: impl Into<String>, chain_id: ChainId, validity_days: u32) -> Self {
        Self {
            public_key_material: SigningKey::generate().public_key().to_hex_material(),
            store_address: store_address.into(),
            chain_id,
            started_at: Timestamp::now(),
            validity_days,
        }
    }

    /// The message a wallet signs to reveal a value.
    ///
    /// ```text
    /// publickey:<material>
    /// contractAddresses:<store address>
    /// contractsChainId:<chain id>
    /// startTimestamp:<unix seconds>
    /// durationDays:<days>
    /// ```
    pub fn challenge(&self) -> String {
        format!(
            "publickey:{}\ncontractAddresses:{}\ncontractsChainId:{}\nstartTimestamp:{}\ndurationDays:{}",
            self.public_key_material,
            self.store_address,
            self.chain_id,
            self.started_at.as_secs(),
            self.validity_days
        )
    }

    /// End of the announced validity window.
    pub fn expires_at(&self) -> Timestamp {
        Timestamp::from_secs(
            self.started_at
                .as_secs()
                .saturating_add(u64::from(self.validity_days) * SECS_PER_DAY),
        )
    }
}
