use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::error::{StoreError, StoreResult};
use crate::traits::LedgerStore;

/// Bounds every call of an inner store.
///
/// The underlying ledger may never answer; a call that exceeds `limit` is
/// abandoned (its future is dropped) and reported as
/// [`StoreError::Timeout`]. Whether the abandoned write still lands on the
/// ledger is up to the backend. An [`unbounded`](Self::unbounded) wrapper
/// passes every call through untimed.
#[derive(Debug)]
pub struct TimeoutStore<S> {
    inner: S,
    limit: Option<Duration>,
}

impl<S> TimeoutStore<S> {
    pub fn new(inner: S, limit: Duration) -> Self {
        Self {
            inner,
            limit: Some(limit),
        }
    }

    /// A wrapper that never times out. Used when the inner store applies
    /// its own bound below some step that must stay untimed.
    pub fn unbounded(inner: S) -> Self {
        Self { inner, limit: None }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn limit(&self) -> Option<Duration> {
        self.limit
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = StoreResult<T>> + Send,
    ) -> StoreResult<T> {
        let Some(limit) = self.limit else {
            return fut.await;
        };
        match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(op, ?limit, "ledger call timed out");
                Err(StoreError::Timeout { op, after: limit })
            }
        }
    }
}

#[async_trait]
impl<S: LedgerStore> LedgerStore for TimeoutStore<S> {
    async fn is_available(&self) -> StoreResult<bool> {
        self.bounded("is_available", self.inner.is_available()).await
    }

    async fn address(&self) -> StoreResult<String> {
        self.bounded("address", self.inner.address()).await
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        self.bounded("get", self.inner.get(key)).await
    }

    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.bounded("set", self.inner.set(key, value)).await
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> StoreResult<bool> {
        self.bounded(
            "compare_and_set",
            self.inner.compare_and_set(key, expected, value),
        )
        .await
    }
}
