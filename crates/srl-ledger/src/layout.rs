//! Key layout of the persisted ledger.

use srl_types::RecordId;

/// Key holding the JSON array of every known record id.
pub const DIRECTORY_KEY: &str = "directory";

/// Prefix of per-record keys.
pub const RECORD_KEY_PREFIX: &str = "record_";

/// Key of the blob for `id`: `record_<id>`.
pub fn record_key(id: &RecordId) -> String {
    format!("{RECORD_KEY_PREFIX}{id}")
}
