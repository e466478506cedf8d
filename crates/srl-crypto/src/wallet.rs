use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use srl_types::{Address, ChainId};
use tracing::debug;

use crate::keys::{KeyError, SigningKey};

/// Errors reported by a wallet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    /// The user dismissed or declined the prompt. Recoverable; callers
    /// should present this differently from a failure.
    #[error("user rejected the request")]
    UserRejected,

    /// No account is connected.
    #[error("wallet is not connected")]
    Disconnected,

    /// Any other wallet-side failure.
    #[error("wallet error: {0}")]
    Failed(String),
}

/// A signature returned by a wallet, opaque to the ledger.
///
/// Nothing in the ledger verifies these bytes; they are kept only so a
/// caller can display or log what was signed.
#[derive(Clone, PartialEq, Eq)]
pub struct WalletSignature {
    pub signer: Address,
    pub bytes: Vec<u8>,
}

impl WalletSignature {
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.bytes))
    }
}

impl fmt::Debug for WalletSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = &self.bytes[..self.bytes.len().min(8)];
        write!(f, "WalletSignature({}, {}...)", self.signer, hex::encode(head))
    }
}

/// Boundary to whatever holds the user's account.
///
/// Implementations may prompt a human, so every call may suspend for an
/// unbounded time; callers impose their own timeouts.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// The connected account, or `None` when disconnected.
    async fn address(&self) -> Option<Address>;

    /// The chain the wallet is currently connected to.
    async fn chain_id(&self) -> Result<ChainId, WalletError>;

    /// Sign a UTF-8 message with the connected account.
    async fn sign(&self, message: &str) -> Result<WalletSignature, WalletError>;
}

#[async_trait]
impl<W: Wallet + ?Sized> Wallet for Arc<W> {
    async fn address(&self) -> Option<Address> {
        (**self).address().await
    }

    async fn chain_id(&self) -> Result<ChainId, WalletError> {
        (**self).chain_id().await
    }

    async fn sign(&self, message: &str) -> Result<WalletSignature, WalletError> {
        (**self).sign(message).await
    }
}

/// Wallet backed by a local Ed25519 key.
///
/// Signs without prompting. The account address is derived from the public
/// key (see [`crate::PublicKey::to_address`]).
pub struct LocalWallet {
    key: SigningKey,
    address: Address,
    chain_id: ChainId,
    connected: AtomicBool,
}

impl LocalWallet {
    /// Create a wallet with a fresh random key.
    pub fn generate(chain_id: ChainId) -> Self {
        Self::from_key(SigningKey::generate(), chain_id)
    }

    /// Create a wallet from an existing key.
    pub fn from_key(key: SigningKey, chain_id: ChainId) -> Self {
        let address = key.public_key().to_address();
        Self {
            key,
            address,
            chain_id,
            connected: AtomicBool::new(true),
        }
    }

    /// Load from a hex-encoded secret, as stored in a key file.
    pub fn from_secret_hex(secret: &str, chain_id: ChainId) -> Result<Self, KeyError> {
        Ok(Self::from_key(SigningKey::from_hex(secret)?, chain_id))
    }

    pub fn secret_hex(&self) -> String {
        self.key.to_hex()
    }

    /// The account address, regardless of connection state.
    pub fn account(&self) -> &Address {
        &self.address
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for LocalWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalWallet")
            .field("address", &self.address)
            .field("chain_id", &self.chain_id)
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[async_trait]
impl Wallet for LocalWallet {
    async fn address(&self) -> Option<Address> {
        self.is_connected().then(|| self.address.clone())
    }

    async fn chain_id(&self) -> Result<ChainId, WalletError> {
        if !self.is_connected() {
            return Err(WalletError::Disconnected);
        }
        Ok(self.chain_id)
    }

    async fn sign(&self, message: &str) -> Result<WalletSignature, WalletError> {
        if !self.is_connected() {
            return Err(WalletError::Disconnected);
        }
        let signature = self.key.sign(message.as_bytes());
        debug!(signer = %self.address, len = message.len(), "local wallet signed message");
        Ok(WalletSignature {
            signer: self.address.clone(),
            bytes: signature.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_wallet_reports_account_and_chain() {
        let wallet = LocalWallet::generate(ChainId(31337));
        assert_eq!(wallet.address().await.as_ref(), Some(wallet.account()));
        assert_eq!(wallet.chain_id().await.unwrap(), ChainId(31337));
    }

    #[tokio::test]
    async fn local_wallet_signs_as_its_key() {
        let wallet = LocalWallet::from_key(SigningKey::from_seed([3u8; 32]), ChainId(1));

        let sig = wallet.sign("challenge").await.unwrap();
        assert_eq!(&sig.signer, wallet.account());
        assert_eq!(sig.bytes.len(), 64);
        assert_eq!(
            sig.bytes,
            SigningKey::from_seed([3u8; 32]).sign(b"challenge").to_vec()
        );
    }

    #[tokio::test]
    async fn disconnected_wallet_refuses() {
        let wallet = LocalWallet::generate(ChainId(1));
        wallet.set_connected(false);
        assert!(wallet.address().await.is_none());
        assert_eq!(wallet.sign("x").await, Err(WalletError::Disconnected));
        assert_eq!(wallet.chain_id().await, Err(WalletError::Disconnected));

        wallet.set_connected(true);
        assert!(wallet.sign("x").await.is_ok());
    }

    #[test]
    fn secret_hex_restores_same_account() {
        let wallet = LocalWallet::generate(ChainId(1));
        let restored = LocalWallet::from_secret_hex(&wallet.secret_hex(), ChainId(1)).unwrap();
        assert_eq!(wallet.account(), restored.account());
    }

    #[test]
    fn signature_hex_is_prefixed() {
        let sig = WalletSignature {
            signer: Address::new("0xabc").unwrap(),
            bytes: vec![0xde, 0xad],
        };
        assert_eq!(sig.to_hex(), "0xdead");
        assert!(format!("{sig:?}").contains("dead"));
    }
}
