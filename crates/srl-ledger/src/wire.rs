//! JSON body stored under each `record_<id>` key.

use serde::{Deserialize, Serialize};
use srl_types::{Address, Record, RecordId, Status, Timestamp};

use crate::error::{LedgerError, LedgerResult};

/// Persisted form of a [`Record`]; the id lives in the key, not the body.
///
/// ```json
/// { "encodedValue": "FHE-NDI=", "createdAt": 1700000000,
///   "author": "0x…", "category": "Fireball", "declaredCost": 42,
///   "status": "Prepared" }
/// ```
///
/// Bodies written by older clients use `data`, `timestamp`, `caster`,
/// `spellType` and `manaCost`, lowercase statuses, and may omit `status`
/// (read as `Prepared`); all of those are accepted on read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordBody {
    #[serde(alias = "data")]
    pub encoded_value: String,
    #[serde(alias = "timestamp")]
    pub created_at: Timestamp,
    #[serde(alias = "caster")]
    pub author: Address,
    #[serde(alias = "spellType")]
    pub category: String,
    #[serde(alias = "manaCost")]
    pub declared_cost: f64,
    #[serde(default)]
    pub status: Status,
}

impl RecordBody {
    pub fn from_record(record: &Record) -> Self {
        Self {
            encoded_value: record.encoded_value.clone(),
            created_at: record.created_at,
            author: record.author.clone(),
            category: record.category.clone(),
            declared_cost: record.declared_cost,
            status: record.status,
        }
    }

    pub fn into_record(self, id: RecordId) -> Record {
        Record {
            id,
            encoded_value: self.encoded_value,
            created_at: self.created_at,
            author: self.author,
            category: self.category,
            declared_cost: self.declared_cost,
            status: self.status,
        }
    }

    /// Serialize to the UTF-8 JSON stored on the ledger.
    pub fn to_bytes(&self, key: &str) -> LedgerResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| LedgerError::parse(key, e.to_string()))
    }

    /// Parse and validate a stored body.
    pub fn from_bytes(key: &str, bytes: &[u8]) -> LedgerResult<Self> {
        let body: Self =
            serde_json::from_slice(bytes).map_err(|e| LedgerError::parse(key, e.to_string()))?;
        if body.author.as_str().trim().is_empty() {
            return Err(LedgerError::parse(key, "empty author"));
        }
        if body.encoded_value.is_empty() {
            return Err(LedgerError::parse(key, "empty encoded value"));
        }
        Ok(body)
    }
}
