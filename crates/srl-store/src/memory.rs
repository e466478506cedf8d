use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

use async_trait::async_trait;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::LedgerStore;

/// A failure to inject into an upcoming write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteFault {
    /// The user dismisses the transaction prompt.
    UserRejected,
    /// The ledger refuses the write with the given reason.
    Rejected(String),
}

impl WriteFault {
    fn into_error(self) -> StoreError {
        match self {
            Self::UserRejected => StoreError::UserRejected,
            Self::Rejected(reason) => StoreError::WriteRejected(reason),
        }
    }
}

/// In-memory, HashMap-based ledger store.
///
/// Intended for tests and embedding. Values live behind a `RwLock`; several
/// clients can share one store through an `Arc` to observe each other's
/// writes. Supports conditional writes, an availability switch, and a queue
/// of faults consumed by subsequent `set`/`compare_and_set` calls.
pub struct InMemoryLedgerStore {
    address: String,
    entries: RwLock<HashMap<String, Vec<u8>>>,
    available: AtomicBool,
    faults: Mutex<VecDeque<WriteFault>>,
    writes: AtomicU64,
}

impl InMemoryLedgerStore {
    /// Create a new empty store with a fixed placeholder address.
    pub fn new() -> Self {
        Self::with_address("0x0000000000000000000000000000000000005e11")
    }

    /// Create a new empty store reporting the given address.
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            entries: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
            faults: Mutex::new(VecDeque::new()),
            writes: AtomicU64::new(0),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().map(|map| map.len()).unwrap_or(0)
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of successful writes since creation.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Return a sorted list of all keys in the store.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .read()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Toggle what `is_available` reports.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Queue a fault for the next write. Faults are consumed in order, one
    /// per write attempt.
    pub fn inject_write_fault(&self, fault: WriteFault) {
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(fault);
    }

    fn take_fault(&self) -> Option<WriteFault> {
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> StoreError {
    StoreError::Backend("lock poisoned".into())
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn is_available(&self) -> StoreResult<bool> {
        Ok(self.available.load(Ordering::SeqCst))
    }

    async fn address(&self) -> StoreResult<String> {
        Ok(self.address.clone())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let map = self.entries.read().map_err(poisoned)?;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        if let Some(fault) = self.take_fault() {
            debug!(key, ?fault, "injected write fault");
            return Err(fault.into_error());
        }
        let mut map = self.entries.write().map_err(poisoned)?;
        map.insert(key.to_string(), value.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> StoreResult<bool> {
        if let Some(fault) = self.take_fault() {
            debug!(key, ?fault, "injected write fault");
            return Err(fault.into_error());
        }
        let mut map = self.entries.write().map_err(poisoned)?;
        if map.get(key).map(Vec::as_slice) != expected {
            return Ok(false);
        }
        map.insert(key.to_string(), value.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }
}

impl std::fmt::Debug for InMemoryLedgerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLedgerStore")
            .field("address", &self.address)
            .field("key_count", &self.len())
            .finish()
    }
}
