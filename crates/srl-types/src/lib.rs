//! Foundation types for the Sealed Record Ledger (SRL).
//!
//! This crate provides the identity, temporal, and record types shared by
//! every other SRL crate. It performs no I/O.
//!
//! # Key Types
//!
//! - [`RecordId`]: client-generated record identifier (time component + random suffix)
//! - [`Status`]: record lifecycle state (`Prepared`, `Cast`, `Failed`)
//! - [`Record`]: one encoded-value entry with its metadata
//! - [`Address`]: wallet account address, compared case-insensitively
//! - [`ChainId`]: numeric chain identifier reported by a wallet
//! - [`Timestamp`]: unix seconds

pub mod error;
pub mod identity;
pub mod record;
pub mod temporal;

pub use error::TypeError;
pub use identity::{Address, ChainId};
pub use record::{Record, RecordId, Status};
pub use temporal::Timestamp;
