use srl_store::LedgerStore;
use srl_types::{Record, RecordId};
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::layout::record_key;
use crate::wire::RecordBody;

/// Reads and writes individual record blobs.
///
/// Every call is a single-key ledger operation; nothing ties a record write
/// to the directory update that makes it visible.
#[derive(Debug, Clone)]
pub struct RecordAccessor<S> {
    store: S,
}

impl<S: LedgerStore> RecordAccessor<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read the record stored under `record_<id>`.
    ///
    /// Returns `Ok(None)` when the key is missing or empty, and
    /// [`LedgerError::Parse`] when the stored body is malformed.
    pub async fn read_record(&self, id: &RecordId) -> LedgerResult<Option<Record>> {
        let key = record_key(id);
        let bytes = match self.store.get(&key).await {
            Ok(Some(bytes)) if !bytes.is_empty() => bytes,
            Ok(_) => return Ok(None),
            Err(e) => return Err(LedgerError::read(&key, e)),
        };
        let body = RecordBody::from_bytes(&key, &bytes)?;
        Ok(Some(body.into_record(id.clone())))
    }

    /// Write `record` under `record_<id>`, replacing any previous body.
    pub async fn write_record(&self, record: &Record) -> LedgerResult<()> {
        let key = record_key(&record.id);
        let bytes = RecordBody::from_record(record).to_bytes(&key)?;
        self.store
            .set(&key, &bytes)
            .await
            .map_err(|e| LedgerError::write(&key, e))?;
        debug!(%key, status = %record.status, "record written");
        Ok(())
    }
}
