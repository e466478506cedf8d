//! Reveal ceremony for the Sealed Record Ledger.
//!
//! A record's encoded value is shown only after the requester's wallet signs
//! a session challenge. The signature is a consent gate: it is requested,
//! bounded by a timeout, and never verified.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use srl_crypto::LocalWallet;
//! use srl_reveal::{RevealConfig, RevealGate, SessionContext};
//! use srl_types::{ChainId, Record};
//!
//! # async fn demo(record: Record) -> Result<(), srl_reveal::RevealError> {
//! let session = Arc::new(SessionContext::new("0x5e11", ChainId(31337), 30));
//! let gate = RevealGate::new(session, RevealConfig::default());
//! let wallet = LocalWallet::generate(ChainId(31337));
//! let revealed = gate.reveal(&record, &wallet).await?;
//! println!("{} = {}", record.id, revealed.value);
//! # Ok(())
//! # }
//! ```

pub mod banner;
pub mod config;
pub mod error;
pub mod gate;
pub mod session;

pub use banner::{BannerState, StatusBanner};
pub use config::RevealConfig;
pub use error::RevealError;
pub use gate::{RevealGate, Revealed};
pub use session::SessionContext;
