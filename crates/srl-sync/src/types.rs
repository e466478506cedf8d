use serde::Serialize;
use srl_types::{Record, RecordId};

/// Why a listed id produced no record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// Listed in the directory but no body under its key.
    Missing,
    /// The stored body could not be parsed.
    Malformed(String),
    /// The ledger read failed.
    ReadFailed(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub id: RecordId,
    pub reason: SkipReason,
}

/// Result of one full load of the ledger.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LoadReport {
    /// Records sorted newest first.
    pub records: Vec<Record>,
    pub skipped: Vec<SkippedEntry>,
    pub store_available: bool,
}

impl LoadReport {
    /// Report for a store that is not serving requests.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
