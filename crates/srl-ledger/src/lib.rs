//! Record ledger protocol for the Sealed Record Ledger (SRL).
//!
//! This crate is the heart of SRL. It provides:
//! - the persisted layout: one JSON directory under `"directory"` and one
//!   JSON blob per record under `"record_<id>"` ([`layout`], [`wire`])
//! - [`RecordAccessor`] -- single-key record reads and writes
//! - [`Directory`] -- the list of known record ids, append-only
//! - [`transition`] -- the `Prepared -> {Cast, Failed}` lifecycle guard
//!
//! Nothing here enforces authorization against a misbehaving client: the
//! ledger accepts any write, and ownership checks are client-side guards.

pub mod accessor;
pub mod directory;
pub mod error;
pub mod layout;
pub mod lifecycle;
pub mod wire;

pub use accessor::RecordAccessor;
pub use directory::{Directory, DirectoryMode, DEFAULT_MAX_RETRIES};
pub use error::{LedgerError, LedgerResult, PreconditionFault};
pub use layout::{record_key, DIRECTORY_KEY, RECORD_KEY_PREFIX};
pub use lifecycle::transition;
pub use wire::RecordBody;
