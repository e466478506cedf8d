use serde::{Deserialize, Serialize};
use srl_store::LedgerStore;
use srl_types::RecordId;
use tracing::{debug, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::layout::DIRECTORY_KEY;

/// Default number of conditional-write attempts before giving up.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// How [`Directory::append_id`] publishes the updated id list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryMode {
    /// Read, append, write back. Two clients appending concurrently can
    /// both read the same list and the later write drops the earlier id.
    #[default]
    LastWriteWins,
    /// Publish with `compare_and_set` against the list that was read and
    /// retry on conflict. Requires a store with conditional writes.
    Conditional,
}

/// The ledger-wide list of record ids, stored as a JSON array of strings
/// under [`DIRECTORY_KEY`]. Order is insertion order.
#[derive(Debug, Clone)]
pub struct Directory<S> {
    store: S,
    mode: DirectoryMode,
    max_retries: u32,
}

impl<S: LedgerStore> Directory<S> {
    pub fn new(store: S) -> Self {
        Self::with_mode(store, DirectoryMode::default(), DEFAULT_MAX_RETRIES)
    }

    pub fn with_mode(store: S, mode: DirectoryMode, max_retries: u32) -> Self {
        Self {
            store,
            mode,
            max_retries: max_retries.max(1),
        }
    }

    pub fn mode(&self) -> DirectoryMode {
        self.mode
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All known ids in insertion order.
    ///
    /// A missing, empty, or malformed directory reads as an empty list;
    /// only a failing ledger read is an error.
    pub async fn list_ids(&self) -> LedgerResult<Vec<RecordId>> {
        let raw = self.snapshot().await?;
        Ok(parse_ids(raw.as_deref()))
    }

    /// Append `id` to the directory. Appending an id that is already
    /// listed is a no-op.
    pub async fn append_id(&self, id: &RecordId) -> LedgerResult<()> {
        match self.mode {
            DirectoryMode::LastWriteWins => self.append_overwrite(id).await,
            DirectoryMode::Conditional => self.append_conditional(id).await,
        }
    }

    async fn snapshot(&self) -> LedgerResult<Option<Vec<u8>>> {
        self.store
            .get(DIRECTORY_KEY)
            .await
            .map_err(|e| LedgerError::read(DIRECTORY_KEY, e))
    }

    async fn append_overwrite(&self, id: &RecordId) -> LedgerResult<()> {
        let raw = self.snapshot().await?;
        let Some(bytes) = appended(raw.as_deref(), id)? else {
            debug!(%id, "id already listed");
            return Ok(());
        };
        self.store
            .set(DIRECTORY_KEY, &bytes)
            .await
            .map_err(|e| LedgerError::write(DIRECTORY_KEY, e))?;
        debug!(%id, "directory updated");
        Ok(())
    }

    async fn append_conditional(&self, id: &RecordId) -> LedgerResult<()> {
        for attempt in 1..=self.max_retries {
            let raw = self.snapshot().await?;
            let Some(bytes) = appended(raw.as_deref(), id)? else {
                debug!(%id, "id already listed");
                return Ok(());
            };
            let written = self
                .store
                .compare_and_set(DIRECTORY_KEY, raw.as_deref(), &bytes)
                .await
                .map_err(|e| LedgerError::write(DIRECTORY_KEY, e))?;
            if written {
                debug!(%id, attempt, "directory updated");
                return Ok(());
            }
            debug!(%id, attempt, "directory changed underneath, retrying");
        }
        warn!(%id, attempts = self.max_retries, "directory append abandoned");
        Err(LedgerError::Contention {
            key: DIRECTORY_KEY.to_string(),
            attempts: self.max_retries,
        })
    }
}

fn parse_ids(raw: Option<&[u8]>) -> Vec<RecordId> {
    let Some(bytes) = raw.filter(|b| !b.is_empty()) else {
        return Vec::new();
    };
    let entries: Vec<serde_json::Value> = match serde_json::from_slice(bytes) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "malformed directory, treating as empty");
            return Vec::new();
        }
    };
    entries
        .into_iter()
        .filter_map(|entry| match entry.as_str().map(RecordId::parse) {
            Some(Ok(id)) => Some(id),
            _ => {
                warn!(%entry, "skipping invalid directory entry");
                None
            }
        })
        .collect()
}

/// The serialized directory with `id` appended, or `None` if it is
/// already present.
///
/// Works on the raw JSON entries so that entries this client cannot parse
/// are written back unchanged.
fn appended(raw: Option<&[u8]>, id: &RecordId) -> LedgerResult<Option<Vec<u8>>> {
    let mut entries: Vec<serde_json::Value> = raw
        .filter(|b| !b.is_empty())
        .and_then(|bytes| serde_json::from_slice(bytes).ok())
        .unwrap_or_default();
    if entries.iter().any(|entry| entry.as_str() == Some(id.as_str())) {
        return Ok(None);
    }
    entries.push(serde_json::Value::String(id.as_str().to_string()));
    let bytes = serde_json::to_vec(&entries)
        .map_err(|e| LedgerError::parse(DIRECTORY_KEY, e.to_string()))?;
    Ok(Some(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use srl_store::{InMemoryLedgerStore, StoreResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Barrier;

    fn id(s: &str) -> RecordId {
        RecordId::parse(s).unwrap()
    }

    /// Holds the first two directory reads until both have happened, so two
    /// appends are guaranteed to start from the same snapshot.
    struct LockstepStore {
        inner: Arc<InMemoryLedgerStore>,
        barrier: Barrier,
        gated: AtomicUsize,
    }

    impl LockstepStore {
        fn new(inner: Arc<InMemoryLedgerStore>) -> Self {
            Self {
                inner,
                barrier: Barrier::new(2),
                gated: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LedgerStore for LockstepStore {
        async fn is_available(&self) -> StoreResult<bool> {
            self.inner.is_available().await
        }

        async fn address(&self) -> StoreResult<String> {
            self.inner.address().await
        }

        async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
            let value = self.inner.get(key).await?;
            if key == DIRECTORY_KEY && self.gated.fetch_add(1, Ordering::SeqCst) < 2 {
                self.barrier.wait().await;
            }
            Ok(value)
        }

        async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
            self.inner.set(key, value).await
        }

        async fn compare_and_set(
            &self,
            key: &str,
            expected: Option<&[u8]>,
            value: &[u8],
        ) -> StoreResult<bool> {
            self.inner.compare_and_set(key, expected, value).await
        }
    }

    #[tokio::test]
    async fn missing_directory_is_empty() {
        let dir = Directory::new(InMemoryLedgerStore::new());
        assert!(dir.list_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sequential_appends_keep_order() {
        let dir = Directory::new(InMemoryLedgerStore::new());
        for name in ["a", "b", "c", "d"] {
            dir.append_id(&id(name)).await.unwrap();
        }
        assert_eq!(
            dir.list_ids().await.unwrap(),
            vec![id("a"), id("b"), id("c"), id("d")]
        );
        let raw = dir.store().get(DIRECTORY_KEY).await.unwrap().unwrap();
        assert_eq!(raw, br#"["a","b","c","d"]"#);
    }

    #[tokio::test]
    async fn append_is_idempotent() {
        let dir = Directory::new(InMemoryLedgerStore::new());
        dir.append_id(&id("a")).await.unwrap();
        dir.append_id(&id("a")).await.unwrap();
        assert_eq!(dir.list_ids().await.unwrap(), vec![id("a")]);
        assert_eq!(dir.store().write_count(), 1);
    }

    #[tokio::test]
    async fn malformed_directory_reads_as_empty() {
        let store = InMemoryLedgerStore::new();
        store.set(DIRECTORY_KEY, b"{\"not\":\"a list\"}").await.unwrap();
        let dir = Directory::new(store);
        assert!(dir.list_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_entries_are_skipped() {
        let store = InMemoryLedgerStore::new();
        store
            .set(DIRECTORY_KEY, br#"["a", 7, "bad id!", "b"]"#)
            .await
            .unwrap();
        let dir = Directory::new(store);
        assert_eq!(dir.list_ids().await.unwrap(), vec![id("a"), id("b")]);
    }

    #[tokio::test]
    async fn append_keeps_entries_it_cannot_parse() {
        let store = InMemoryLedgerStore::new();
        store
            .set(DIRECTORY_KEY, br#"["a","legacy id with space",7,"b"]"#)
            .await
            .unwrap();
        let dir = Directory::new(store);
        dir.append_id(&id("c")).await.unwrap();

        let raw = dir.store().get(DIRECTORY_KEY).await.unwrap().unwrap();
        let stored: Vec<serde_json::Value> = serde_json::from_slice(&raw).unwrap();
        assert_eq!(
            stored,
            serde_json::json!(["a", "legacy id with space", 7, "b", "c"])
                .as_array()
                .unwrap()
                .clone()
        );
        assert_eq!(
            dir.list_ids().await.unwrap(),
            vec![id("a"), id("b"), id("c")]
        );
    }

    #[tokio::test]
    async fn concurrent_appends_lose_one_id_without_conditional_writes() {
        let inner = Arc::new(InMemoryLedgerStore::new());
        let dir = Directory::new(LockstepStore::new(Arc::clone(&inner)));
        let (ia, ib) = (id("a"), id("b"));
        let (a, b) = tokio::join!(dir.append_id(&ia), dir.append_id(&ib));
        a.unwrap();
        b.unwrap();
        assert_eq!(dir.list_ids().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_appends_keep_both_ids_with_conditional_writes() {
        let inner = Arc::new(InMemoryLedgerStore::new());
        let dir = Directory::with_mode(
            LockstepStore::new(Arc::clone(&inner)),
            DirectoryMode::Conditional,
            DEFAULT_MAX_RETRIES,
        );
        let (ia, ib) = (id("a"), id("b"));
        let (a, b) = tokio::join!(dir.append_id(&ia), dir.append_id(&ib));
        a.unwrap();
        b.unwrap();
        let mut ids = dir.list_ids().await.unwrap();
        ids.sort();
        assert_eq!(ids, vec![id("a"), id("b")]);
    }

    #[tokio::test]
    async fn conditional_mode_needs_store_support() {
        struct PlainStore(InMemoryLedgerStore);

        #[async_trait]
        impl LedgerStore for PlainStore {
            async fn is_available(&self) -> StoreResult<bool> {
                Ok(true)
            }
            async fn address(&self) -> StoreResult<String> {
                self.0.address().await
            }
            async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
                self.0.get(key).await
            }
            async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
                self.0.set(key, value).await
            }
        }

        let dir = Directory::with_mode(
            PlainStore(InMemoryLedgerStore::new()),
            DirectoryMode::Conditional,
            3,
        );
        let err = dir.append_id(&id("a")).await.unwrap_err();
        assert!(matches!(err, LedgerError::Write { .. }));
    }

    #[tokio::test]
    async fn user_cancelled_append_leaves_directory_untouched() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let dir = Directory::new(Arc::clone(&store));
        dir.append_id(&id("a")).await.unwrap();
        store.inject_write_fault(srl_store::WriteFault::UserRejected);
        let err = dir.append_id(&id("b")).await.unwrap_err();
        assert!(err.is_user_rejected());
        assert_eq!(dir.list_ids().await.unwrap(), vec![id("a")]);
    }

    #[test]
    fn mode_deserializes_from_snake_case() {
        let mode: DirectoryMode = serde_json::from_str("\"conditional\"").unwrap();
        assert_eq!(mode, DirectoryMode::Conditional);
        assert_eq!(DirectoryMode::default(), DirectoryMode::LastWriteWins);
    }
}
