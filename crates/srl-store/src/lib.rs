//! Key-value ledger boundary for the Sealed Record Ledger.
//!
//! The ledger that backs SRL is an external key-value store: single-key
//! `get`/`set`, an address, and an availability probe. This crate defines
//! that boundary as the async [`LedgerStore`] trait and ships three
//! implementations:
//!
//! - [`InMemoryLedgerStore`] -- `HashMap`-based store for tests and embedding,
//!   with write-fault injection
//! - [`FileLedgerStore`] -- single JSON file, shared by every process that
//!   opens the same path
//! - [`TimeoutStore`] -- wrapper bounding every call of an inner store
//!
//! # Design Rules
//!
//! 1. The store never interprets values -- it is a pure key-value store.
//! 2. A missing key reads as `Ok(None)`; it is not an error.
//! 3. No atomicity across keys. Each write is visible to later reads, with
//!    no bound on propagation latency for remote backends.
//! 4. A write cancelled by the user (wallet/transaction prompt dismissed)
//!    surfaces as [`StoreError::UserRejected`], never as a generic failure.
//! 5. Conditional writes ([`LedgerStore::compare_and_set`]) are optional;
//!    backends without them return [`StoreError::Unsupported`].

pub mod error;
pub mod file;
pub mod memory;
pub mod timeout;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use file::FileLedgerStore;
pub use memory::{InMemoryLedgerStore, WriteFault};
pub use timeout::TimeoutStore;
pub use traits::LedgerStore;
