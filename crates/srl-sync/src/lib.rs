//! Batch loading and querying for the Sealed Record Ledger.
//!
//! Reads the directory, loads each listed record, and tolerates corrupt or
//! missing entries: one bad record never hides the rest of the ledger.

pub mod engine;
pub mod error;
pub mod filter;
pub mod stats;
pub mod types;

pub use engine::SyncEngine;
pub use error::{SyncError, SyncResult};
pub use filter::{filter, StatusFacet};
pub use stats::RecordStats;
pub use types::{LoadReport, SkipReason, SkippedEntry};
