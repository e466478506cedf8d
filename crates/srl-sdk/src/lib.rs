//! High-level client for the Sealed Record Ledger.
//!
//! [`Srl`] wires a ledger store and a wallet into the record protocol:
//! creating records, moving them through their lifecycle, loading and
//! querying the ledger, and running the reveal ceremony. This is the main
//! entry point for applications embedding SRL.

pub mod activity;
pub mod client;
pub mod config;
pub mod error;

pub use activity::{Activity, ActivityKind, ActivityLog, Outcome};
pub use client::Srl;
pub use config::SrlConfig;
pub use error::{SdkError, SdkResult};

// Re-export key types
pub use srl_crypto::{LocalWallet, Wallet, WalletError};
pub use srl_ledger::{DirectoryMode, PreconditionFault};
pub use srl_reveal::{BannerState, Revealed, SessionContext};
pub use srl_store::{FileLedgerStore, InMemoryLedgerStore, LedgerStore};
pub use srl_sync::{LoadReport, RecordStats, StatusFacet};
pub use srl_types::{Address, ChainId, Record, RecordId, Status, Timestamp};
