//! Value encoding, signing keys, and the wallet boundary for the Sealed
//! Record Ledger.
//!
//! - [`ValueCodec`] -- reversible `f64` <-> tagged string encoding. It is a
//!   placeholder for a homomorphic scheme and provides **no**
//!   confidentiality: anyone can decode it without a secret.
//! - [`SigningKey`] / [`PublicKey`] -- Ed25519 keys behind the local wallet
//!   and the public material handed to reveal sessions.
//! - [`Wallet`] -- the async boundary to whatever holds the user's account
//!   (`address`, `chain_id`, `sign`). [`LocalWallet`] is a key-file backed
//!   implementation for the CLI and tests.
//!
//! All crypto operations wrap established libraries -- no custom cryptography.

pub mod codec;
pub mod keys;
pub mod wallet;

pub use codec::{CodecError, ValueCodec};
pub use keys::{KeyError, PublicKey, SigningKey};
pub use wallet::{LocalWallet, Wallet, WalletError, WalletSignature};
