use ed25519_dalek::Signer;
use srl_types::Address;

const ADDRESS_DOMAIN: &[u8] = b"srl-address-v1:";

/// An Ed25519 secret key, as held by [`crate::LocalWallet`] and persisted
/// in key files as 64 hex characters.
pub struct SigningKey(ed25519_dalek::SigningKey);

/// The public half of a [`SigningKey`].
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey(ed25519_dalek::VerifyingKey);

impl SigningKey {
    pub fn generate() -> Self {
        Self(ed25519_dalek::SigningKey::generate(&mut rand::thread_rng()))
    }

    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self(ed25519_dalek::SigningKey::from_bytes(&seed))
    }

    /// Parse the contents of a key file. Surrounding whitespace is ignored.
    pub fn from_hex(text: &str) -> Result<Self, KeyError> {
        let raw = hex::decode(text.trim()).map_err(|_| KeyError::NotHex)?;
        let seed: [u8; 32] = raw
            .try_into()
            .map_err(|raw: Vec<u8>| KeyError::Length(raw.len()))?;
        Ok(Self::from_seed(seed))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0.as_bytes())
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0.verifying_key())
    }

    /// Raw 64-byte Ed25519 signature over `message`.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.0.sign(message).to_bytes()
    }
}

impl PublicKey {
    /// Account address: the trailing 20 bytes of a domain-separated BLAKE3
    /// digest of the key.
    pub fn to_address(&self) -> Address {
        let digest = blake3::Hasher::new()
            .update(ADDRESS_DOMAIN)
            .update(self.0.as_bytes())
            .finalize();
        let mut account = [0u8; 20];
        account.copy_from_slice(&digest.as_bytes()[12..]);
        Address::from_bytes(account)
    }

    /// `0x`-prefixed hex, as handed to reveal sessions.
    pub fn to_hex_material(&self) -> String {
        format!("0x{}", hex::encode(self.0.as_bytes()))
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", self.to_hex_material())
    }
}

/// Why a key file could not be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("key is not hex")]
    NotHex,
    #[error("key must be 32 bytes, got {0}")]
    Length(usize),
}
