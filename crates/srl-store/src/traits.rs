use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};

/// External key-value ledger.
///
/// All implementations must satisfy these invariants:
/// - `get` on a key that was never written returns `Ok(None)`.
/// - `set` replaces the whole value of one key; there is no multi-key
///   transaction.
/// - The store never interprets values.
/// - A user-cancelled write returns [`StoreError::UserRejected`].
/// - All I/O errors are propagated, never silently ignored.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Whether the ledger is currently serving requests.
    async fn is_available(&self) -> StoreResult<bool>;

    /// The ledger's own address (e.g. the contract address on chain).
    async fn address(&self) -> StoreResult<String>;

    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Write `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Write `value` under `key` only if the current value equals
    /// `expected` (`None` = key absent). Returns `Ok(false)` when the
    /// current value differs and nothing was written.
    ///
    /// Optional. The default implementation reports
    /// [`StoreError::Unsupported`].
    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> StoreResult<bool> {
        let _ = (key, expected, value);
        Err(StoreError::Unsupported("compare_and_set"))
    }
}

#[async_trait]
impl<S: LedgerStore + ?Sized> LedgerStore for Arc<S> {
    async fn is_available(&self) -> StoreResult<bool> {
        (**self).is_available().await
    }

    async fn address(&self) -> StoreResult<String> {
        (**self).address().await
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        (**self).set(key, value).await
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> StoreResult<bool> {
        (**self).compare_and_set(key, expected, value).await
    }
}
