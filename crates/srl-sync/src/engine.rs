use std::collections::HashSet;

use srl_ledger::{Directory, LedgerError, RecordAccessor};
use srl_store::LedgerStore;
use tracing::{debug, info, warn};

use crate::error::SyncResult;
use crate::types::{LoadReport, SkipReason, SkippedEntry};

/// Loads the full set of records visible through the directory.
pub struct SyncEngine<S> {
    directory: Directory<S>,
    accessor: RecordAccessor<S>,
}

impl<S: LedgerStore + Clone> SyncEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            directory: Directory::new(store.clone()),
            accessor: RecordAccessor::new(store),
        }
    }
}

impl<S: LedgerStore> SyncEngine<S> {
    pub fn from_parts(directory: Directory<S>, accessor: RecordAccessor<S>) -> Self {
        Self {
            directory,
            accessor,
        }
    }

    /// Load every record listed in the directory.
    ///
    /// Records are read one at a time in directory order. Ids that are
    /// missing, unreadable, or malformed are reported in
    /// [`LoadReport::skipped`] and do not fail the load; only a failed
    /// directory read does. The result is sorted by `created_at`, newest
    /// first, keeping directory order for equal timestamps.
    pub async fn load_all(&self) -> SyncResult<LoadReport> {
        let available = match self.accessor.store().is_available().await {
            Ok(available) => available,
            Err(e) => {
                warn!(error = %e, "availability check failed");
                false
            }
        };
        if !available {
            info!("ledger unavailable, nothing loaded");
            return Ok(LoadReport::unavailable());
        }

        let ids = self.directory.list_ids().await?;
        let mut seen = HashSet::with_capacity(ids.len());
        let mut records = Vec::with_capacity(ids.len());
        let mut skipped = Vec::new();

        for id in ids {
            if !seen.insert(id.clone()) {
                debug!(%id, "duplicate directory entry");
                continue;
            }
            match self.accessor.read_record(&id).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {
                    warn!(%id, "listed record has no body");
                    skipped.push(SkippedEntry {
                        id,
                        reason: SkipReason::Missing,
                    });
                }
                Err(LedgerError::Parse { reason, .. }) => {
                    warn!(%id, %reason, "skipping malformed record");
                    skipped.push(SkippedEntry {
                        id,
                        reason: SkipReason::Malformed(reason),
                    });
                }
                Err(e) => {
                    warn!(%id, error = %e, "skipping unreadable record");
                    skipped.push(SkippedEntry {
                        id,
                        reason: SkipReason::ReadFailed(e.to_string()),
                    });
                }
            }
        }

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(
            loaded = records.len(),
            skipped = skipped.len(),
            "ledger loaded"
        );
        Ok(LoadReport {
            records,
            skipped,
            store_available: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use srl_ledger::{record_key, DIRECTORY_KEY};
    use srl_store::InMemoryLedgerStore;
    use srl_types::{Address, Record, RecordId, Status, Timestamp};
    use std::sync::Arc;

    fn record(id: &str, created_at: u64) -> Record {
        Record {
            id: RecordId::parse(id).unwrap(),
            encoded_value: "FHE-NDI=".into(),
            created_at: Timestamp::from_secs(created_at),
            author: Address::new("0x00000000000000000000000000000000000000aa").unwrap(),
            category: "Fireball".into(),
            declared_cost: 42.0,
            status: Status::Prepared,
        }
    }

    async fn seed(store: &Arc<InMemoryLedgerStore>, records: &[Record]) {
        let accessor = RecordAccessor::new(Arc::clone(store));
        let directory = Directory::new(Arc::clone(store));
        for r in records {
            accessor.write_record(r).await.unwrap();
            directory.append_id(&r.id).await.unwrap();
        }
    }

    #[tokio::test]
    async fn empty_ledger_loads_nothing() {
        let engine = SyncEngine::new(Arc::new(InMemoryLedgerStore::new()));
        let report = engine.load_all().await.unwrap();
        assert!(report.is_empty());
        assert!(report.skipped.is_empty());
        assert!(report.store_available);
    }

    #[tokio::test]
    async fn malformed_record_is_skipped_not_fatal() {
        let store = Arc::new(InMemoryLedgerStore::new());
        seed(&store, &[record("good", 10)]).await;
        store.set(&record_key(&RecordId::parse("bad").unwrap()), b"{broken").await.unwrap();
        Directory::new(Arc::clone(&store))
            .append_id(&RecordId::parse("bad").unwrap())
            .await
            .unwrap();

        let report = SyncEngine::new(Arc::clone(&store)).load_all().await.unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].id.as_str(), "good");
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].id.as_str(), "bad");
        assert!(matches!(report.skipped[0].reason, SkipReason::Malformed(_)));
    }

    #[tokio::test]
    async fn missing_body_is_skipped() {
        let store = Arc::new(InMemoryLedgerStore::new());
        store.set(DIRECTORY_KEY, br#"["ghost"]"#).await.unwrap();
        let report = SyncEngine::new(Arc::clone(&store)).load_all().await.unwrap();
        assert!(report.is_empty());
        assert_eq!(report.skipped[0].reason, SkipReason::Missing);
    }

    #[tokio::test]
    async fn sorted_newest_first_with_stable_ties() {
        let store = Arc::new(InMemoryLedgerStore::new());
        seed(
            &store,
            &[record("old", 1), record("tie-a", 5), record("new", 9), record("tie-b", 5)],
        )
        .await;
        let report = SyncEngine::new(Arc::clone(&store)).load_all().await.unwrap();
        let order: Vec<&str> = report.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(order, vec!["new", "tie-a", "tie-b", "old"]);
    }

    #[tokio::test]
    async fn duplicate_ids_load_once() {
        let store = Arc::new(InMemoryLedgerStore::new());
        seed(&store, &[record("a", 1)]).await;
        store.set(DIRECTORY_KEY, br#"["a","a"]"#).await.unwrap();
        let report = SyncEngine::new(Arc::clone(&store)).load_all().await.unwrap();
        assert_eq!(report.records.len(), 1);
    }

    #[tokio::test]
    async fn unavailable_store_yields_empty_view() {
        let store = Arc::new(InMemoryLedgerStore::new());
        seed(&store, &[record("a", 1)]).await;
        store.set_available(false);
        let report = SyncEngine::new(Arc::clone(&store)).load_all().await.unwrap();
        assert!(!report.store_available);
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn legacy_bodies_are_loaded() {
        let store = Arc::new(InMemoryLedgerStore::new());
        store
            .set(
                "record_spell-1",
                br#"{"data":"FHE-Nw==","timestamp":3,"caster":"0xabc","spellType":"Healing","manaCost":7,"status":"failed"}"#,
            )
            .await
            .unwrap();
        store.set(DIRECTORY_KEY, br#"["spell-1"]"#).await.unwrap();
        let report = SyncEngine::new(Arc::clone(&store)).load_all().await.unwrap();
        let r = report.get(&RecordId::parse("spell-1").unwrap()).unwrap();
        assert_eq!(r.status, Status::Failed);
        assert_eq!(r.category, "Healing");
    }
}
