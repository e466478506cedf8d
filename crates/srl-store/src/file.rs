use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::LedgerStore;

/// On-disk layout of a [`FileLedgerStore`].
///
/// ```json
/// { "address": "0x…", "entries": { "<key>": "<base64 value>" } }
/// ```
#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    address: String,
    entries: BTreeMap<String, String>,
}

/// Ledger store persisted as a single JSON file.
///
/// Every operation re-reads the file, so separate processes opening the
/// same path observe each other's writes. Writes go to a synced temporary
/// sibling that is then renamed over the ledger file.
///
/// Each read-modify-write holds an exclusive OS lock on `<path>.lock` for
/// its whole duration, so `set` and `compare_and_set` are serialized across
/// every handle and process that opens the same path.
pub struct FileLedgerStore {
    path: PathBuf,
    address: String,
    guard: Mutex<()>,
}

impl FileLedgerStore {
    /// Open (or create) the ledger file at `path`.
    ///
    /// A new file gets an address derived from the path it was created at.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let _lock = FileLock::acquire(&path).await?;
        let address = match read_file(&path).await? {
            Some(file) => file.address,
            None => {
                let file = LedgerFile {
                    address: derive_address(&path),
                    entries: BTreeMap::new(),
                };
                write_file(&path, &file).await?;
                debug!(path = %path.display(), address = %file.address, "created ledger file");
                file.address
            }
        };

        Ok(Self {
            path,
            address,
            guard: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> StoreResult<LedgerFile> {
        Ok(read_file(&self.path).await?.unwrap_or_else(|| LedgerFile {
            address: self.address.clone(),
            entries: BTreeMap::new(),
        }))
    }

    /// Exclusive access for a read-modify-write: the in-process guard first,
    /// then the lock file shared with other handles and processes.
    async fn exclusive(&self) -> StoreResult<(MutexGuard<'_, ()>, FileLock)> {
        let guard = self.guard.lock().await;
        let lock = FileLock::acquire(&self.path).await?;
        Ok((guard, lock))
    }
}

/// Exclusive lock on the `<path>.lock` sibling of a ledger file, released
/// on drop.
struct FileLock(File);

impl FileLock {
    async fn acquire(ledger: &Path) -> StoreResult<Self> {
        let mut lock_path = ledger.as_os_str().to_owned();
        lock_path.push(".lock");
        let lock_path = PathBuf::from(lock_path);
        tokio::task::spawn_blocking(move || -> StoreResult<Self> {
            let file = OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(&lock_path)?;
            FileExt::lock_exclusive(&file)?;
            Ok(Self(file))
        })
        .await
        .map_err(|e| StoreError::Backend(format!("lock task failed: {e}")))?
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.0) {
            warn!(error = %e, "failed to release ledger lock");
        }
    }
}

async fn read_file(path: &Path) -> StoreResult<Option<LedgerFile>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let file = serde_json::from_slice(&bytes)
        .map_err(|e| StoreError::Serialization(format!("{}: {e}", path.display())))?;
    Ok(Some(file))
}

async fn write_file(path: &Path, file: &LedgerFile) -> StoreResult<()> {
    let bytes =
        serde_json::to_vec_pretty(file).map_err(|e| StoreError::Serialization(e.to_string()))?;
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || persist(&path, &bytes))
        .await
        .map_err(|e| StoreError::Backend(format!("write task failed: {e}")))?
}

fn persist(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| StoreError::Io(err.error))?;
    Ok(())
}

fn derive_address(path: &Path) -> String {
    let absolute = std::fs::canonicalize(path.parent().unwrap_or(Path::new(".")))
        .map(|dir| dir.join(path.file_name().unwrap_or_default()))
        .unwrap_or_else(|_| path.to_path_buf());
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"srl-file-ledger-v1:");
    hasher.update(absolute.to_string_lossy().as_bytes());
    format!("0x{}", hex::encode(&hasher.finalize().as_bytes()[..20]))
}

fn decode_value(key: &str, encoded: &str) -> StoreResult<Vec<u8>> {
    STANDARD
        .decode(encoded)
        .map_err(|e| StoreError::Serialization(format!("value of {key:?}: {e}")))
}

#[async_trait]
impl LedgerStore for FileLedgerStore {
    async fn is_available(&self) -> StoreResult<bool> {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ledger file unavailable");
                Ok(false)
            }
        }
    }

    async fn address(&self) -> StoreResult<String> {
        Ok(self.address.clone())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let _guard = self.guard.lock().await;
        let file = self.load().await?;
        file.entries
            .get(key)
            .map(|encoded| decode_value(key, encoded))
            .transpose()
    }

    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let _exclusive = self.exclusive().await?;
        let mut file = self.load().await?;
        file.entries.insert(key.to_string(), STANDARD.encode(value));
        write_file(&self.path, &file).await?;
        debug!(key, len = value.len(), "ledger file write");
        Ok(())
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> StoreResult<bool> {
        let _exclusive = self.exclusive().await?;
        let mut file = self.load().await?;
        let current = file
            .entries
            .get(key)
            .map(|encoded| decode_value(key, encoded))
            .transpose()?;
        if current.as_deref() != expected {
            return Ok(false);
        }
        file.entries.insert(key.to_string(), STANDARD.encode(value));
        write_file(&self.path, &file).await?;
        debug!(key, len = value.len(), "ledger file conditional write");
        Ok(true)
    }
}

impl std::fmt::Debug for FileLedgerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileLedgerStore")
            .field("path", &self.path)
            .field("address", &self.address)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_creates_file_with_address() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.json");
        let store = FileLedgerStore::open(&path).await.unwrap();
        assert!(path.exists());
        assert!(store.is_available().await.unwrap());
        let address = store.address().await.unwrap();
        assert!(address.starts_with("0x"));
        assert_eq!(address.len(), 42);
    }

    #[tokio::test]
    async fn reopen_keeps_address_and_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let first = FileLedgerStore::open(&path).await.unwrap();
        first.set("k", b"value").await.unwrap();

        let second = FileLedgerStore::open(&path).await.unwrap();
        assert_eq!(
            second.address().await.unwrap(),
            first.address().await.unwrap()
        );
        assert_eq!(second.get("k").await.unwrap(), Some(b"value".to_vec()));
    }

    #[tokio::test]
    async fn writes_are_visible_to_other_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let a = FileLedgerStore::open(&path).await.unwrap();
        let b = FileLedgerStore::open(&path).await.unwrap();
        a.set("shared", b"1").await.unwrap();
        assert_eq!(b.get("shared").await.unwrap(), Some(b"1".to_vec()));
        assert!(b.get("other").await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writes_through_separate_handles_all_land() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let handles = [
            std::sync::Arc::new(FileLedgerStore::open(&path).await.unwrap()),
            std::sync::Arc::new(FileLedgerStore::open(&path).await.unwrap()),
        ];

        let mut tasks = Vec::new();
        for i in 0..24 {
            let store = std::sync::Arc::clone(&handles[i % 2]);
            tasks.push(tokio::spawn(async move {
                store.set(&format!("key-{i}"), i.to_string().as_bytes()).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let reader = FileLedgerStore::open(&path).await.unwrap();
        for i in 0..24 {
            assert_eq!(
                reader.get(&format!("key-{i}")).await.unwrap(),
                Some(i.to_string().into_bytes()),
                "key-{i} was lost"
            );
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn compare_and_set_across_handles_admits_one_winner() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let a = std::sync::Arc::new(FileLedgerStore::open(&path).await.unwrap());
        let b = std::sync::Arc::new(FileLedgerStore::open(&path).await.unwrap());

        let (ra, rb) = tokio::join!(
            tokio::spawn({
                let a = std::sync::Arc::clone(&a);
                async move { a.compare_and_set("slot", None, b"a").await }
            }),
            tokio::spawn({
                let b = std::sync::Arc::clone(&b);
                async move { b.compare_and_set("slot", None, b"b").await }
            }),
        );
        let won = [ra.unwrap().unwrap(), rb.unwrap().unwrap()];
        assert_eq!(won.iter().filter(|w| **w).count(), 1);
    }

    #[tokio::test]
    async fn compare_and_set_semantics() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLedgerStore::open(dir.path().join("ledger.json"))
            .await
            .unwrap();
        assert!(store.compare_and_set("k", None, b"a").await.unwrap());
        assert!(!store.compare_and_set("k", None, b"b").await.unwrap());
        assert!(store.compare_and_set("k", Some(b"a"), b"c").await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), Some(b"c".to_vec()));
    }

    #[tokio::test]
    async fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let store = FileLedgerStore::open(&path).await.unwrap();
        tokio::fs::write(&path, b"{not json").await.unwrap();
        let err = store.get("k").await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[tokio::test]
    async fn removed_file_reports_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let store = FileLedgerStore::open(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();
        assert!(!store.is_available().await.unwrap());
    }
}
