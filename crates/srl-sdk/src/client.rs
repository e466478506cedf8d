use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use srl_crypto::{ValueCodec, Wallet};
use srl_ledger::{transition, Directory, PreconditionFault, RecordAccessor};
use srl_reveal::{BannerState, RevealGate, Revealed, SessionContext, StatusBanner};
use srl_store::{LedgerStore, TimeoutStore};
use srl_sync::{filter, LoadReport, RecordStats, StatusFacet, SyncEngine};
use srl_types::{Address, ChainId, Record, RecordId, Status, Timestamp};
use tracing::{info, warn};

use crate::activity::{Activity, ActivityKind, ActivityLog, Outcome};
use crate::config::SrlConfig;
use crate::error::{SdkError, SdkResult};

type Ledger<S> = Arc<TimeoutStore<S>>;

/// High-level SRL client: one wallet against one ledger.
///
/// All methods take `&self`; a client can be shared behind an `Arc` and
/// driven from several tasks. Nothing coordinates separate clients writing
/// to the same ledger beyond what [`SrlConfig::directory_mode`] provides.
pub struct Srl<S, W> {
    store: Ledger<S>,
    wallet: W,
    accessor: RecordAccessor<Ledger<S>>,
    directory: Directory<Ledger<S>>,
    sync: SyncEngine<Ledger<S>>,
    gate: RevealGate,
    config: SrlConfig,
    banner: Mutex<StatusBanner>,
    activity: Mutex<ActivityLog>,
    pending_reveals: Mutex<HashSet<RecordId>>,
    revealed: Mutex<HashMap<RecordId, f64>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S: LedgerStore, W: Wallet> Srl<S, W> {
    /// Connect `wallet` to `store` and start a reveal session.
    ///
    /// Every ledger call is bounded by the configured operation timeout.
    /// The session records the store address and the wallet's chain as
    /// they are now; a wallet that cannot report its chain gets chain `0`.
    pub async fn connect(store: S, wallet: W, config: SrlConfig) -> SdkResult<Self> {
        let timeout = config.operation_timeout();
        Self::start(TimeoutStore::new(store, timeout), wallet, config).await
    }

    /// Like [`connect`](Self::connect), but ledger calls are not bounded
    /// here. For stores that put a wait on a human in front of the ledger
    /// and bound only the ledger call beneath it with their own
    /// [`TimeoutStore`].
    pub async fn connect_unbounded(store: S, wallet: W, config: SrlConfig) -> SdkResult<Self> {
        Self::start(TimeoutStore::unbounded(store), wallet, config).await
    }

    async fn start(store: TimeoutStore<S>, wallet: W, config: SrlConfig) -> SdkResult<Self> {
        config.validate()?;
        let store = Arc::new(store);
        let store_address = store.address().await?;
        let chain_id = match wallet.chain_id().await {
            Ok(chain_id) => chain_id,
            Err(e) => {
                warn!(error = %e, "wallet did not report a chain, using 0");
                ChainId(0)
            }
        };
        let session = Arc::new(SessionContext::new(
            store_address,
            chain_id,
            config.validity_days,
        ));
        info!(
            store = %session.store_address,
            chain = %session.chain_id,
            mode = ?config.directory_mode,
            "client connected"
        );

        Ok(Self {
            accessor: RecordAccessor::new(Arc::clone(&store)),
            directory: Directory::with_mode(
                Arc::clone(&store),
                config.directory_mode,
                config.max_retries,
            ),
            sync: SyncEngine::new(Arc::clone(&store)),
            gate: RevealGate::new(session, config.reveal_config()),
            banner: Mutex::new(config.banner()),
            activity: Mutex::new(ActivityLog::new(config.activity_capacity)),
            pending_reveals: Mutex::new(HashSet::new()),
            revealed: Mutex::new(HashMap::new()),
            store,
            wallet,
            config,
        })
    }

    // ---- Writes ----

    /// Encode `declared_cost` and publish a new `Prepared` record authored
    /// by the connected account.
    ///
    /// The record body is written first, then its id is appended to the
    /// directory. If the append fails the body stays on the ledger but is
    /// unreachable through the directory.
    pub async fn create_record(&self, category: &str, declared_cost: f64) -> SdkResult<Record> {
        let author = self.account().await?;
        let category = category.trim();
        if category.is_empty() {
            return Err(PreconditionFault::InvalidInput("category must not be empty".into()).into());
        }
        if !declared_cost.is_finite() {
            return Err(
                PreconditionFault::InvalidInput("declared cost must be a finite number".into())
                    .into(),
            );
        }

        let record = Record {
            id: RecordId::generate(),
            encoded_value: ValueCodec::encode(declared_cost)?,
            created_at: Timestamp::now(),
            author,
            category: category.to_string(),
            declared_cost,
            status: Status::Prepared,
        };

        self.tracked(
            ActivityKind::Create,
            &record.id,
            "Encoding record...",
            "Record encoded and prepared",
            async {
                self.accessor.write_record(&record).await?;
                self.directory.append_id(&record.id).await?;
                Ok::<(), SdkError>(())
            },
        )
        .await?;
        info!(id = %record.id, category = %record.category, "record created");
        Ok(record)
    }

    /// Move a `Prepared` record authored by this account to `Cast`.
    pub async fn cast(&self, id: &RecordId) -> SdkResult<Record> {
        self.tracked(
            ActivityKind::Cast,
            id,
            "Casting record...",
            "Record cast",
            self.transition_to(id, Status::Cast),
        )
        .await
    }

    /// Move a `Prepared` record authored by this account to `Failed`.
    pub async fn fail(&self, id: &RecordId) -> SdkResult<Record> {
        self.tracked(
            ActivityKind::Fail,
            id,
            "Marking record as failed...",
            "Record marked as failed",
            self.transition_to(id, Status::Failed),
        )
        .await
    }

    async fn transition_to(&self, id: &RecordId, target: Status) -> SdkResult<Record> {
        let caller = self.account().await?;
        let current = self.get(id).await?;
        let updated = transition(&current, target, &caller)?;
        self.accessor.write_record(&updated).await?;
        info!(%id, status = %target, "record transitioned");
        Ok(updated)
    }

    // ---- Reads ----

    /// Load every reachable record, newest first.
    pub async fn load_all(&self) -> SdkResult<LoadReport> {
        Ok(self.sync.load_all().await?)
    }

    /// Load, then keep records matching `query` and `facet`.
    pub async fn search(&self, query: &str, facet: StatusFacet) -> SdkResult<Vec<Record>> {
        let report = self.load_all().await?;
        Ok(filter(&report.records, query, facet)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn stats(&self) -> SdkResult<RecordStats> {
        let report = self.load_all().await?;
        Ok(RecordStats::from_records(&report.records))
    }

    /// Read one record directly from the ledger.
    pub async fn get(&self, id: &RecordId) -> SdkResult<Record> {
        self.accessor
            .read_record(id)
            .await?
            .ok_or_else(|| SdkError::RecordNotFound(id.clone()))
    }

    // ---- Reveal ----

    /// Run the reveal ceremony for `id` and remember the value for this
    /// session.
    ///
    /// A second reveal of the same record while one is still waiting on
    /// the wallet fails with [`SdkError::RevealPending`].
    pub async fn reveal(&self, id: &RecordId) -> SdkResult<Revealed> {
        self.account().await?;
        let _pending = PendingReveal::claim(&self.pending_reveals, id)?;
        let revealed = self
            .tracked(
                ActivityKind::Reveal,
                id,
                "Requesting signature to reveal...",
                "Value revealed",
                async {
                    let record = self.get(id).await?;
                    Ok::<_, SdkError>(self.gate.reveal(&record, &self.wallet).await?)
                },
            )
            .await?;
        lock(&self.revealed).insert(id.clone(), revealed.value);
        Ok(revealed)
    }

    /// Value revealed earlier in this session, if any. Never persisted.
    pub fn revealed_value(&self, id: &RecordId) -> Option<f64> {
        lock(&self.revealed).get(id).copied()
    }

    /// Forget a revealed value. Returns `true` if one was shown.
    pub fn hide(&self, id: &RecordId) -> bool {
        lock(&self.revealed).remove(id).is_some()
    }

    // ---- Session ----

    pub fn session(&self) -> &SessionContext {
        self.gate.session()
    }

    pub fn config(&self) -> &SrlConfig {
        &self.config
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn store(&self) -> &S {
        self.store.inner()
    }

    /// Banner state as of now.
    pub fn banner(&self) -> BannerState {
        lock(&self.banner).state_at(Instant::now()).clone()
    }

    /// This client's operations, newest first.
    pub fn activity(&self) -> Vec<Activity> {
        lock(&self.activity).recent()
    }

    async fn account(&self) -> SdkResult<Address> {
        self.wallet
            .address()
            .await
            .ok_or(SdkError::Precondition(PreconditionFault::Disconnected))
    }

    /// Run `op` with banner feedback and an activity entry.
    async fn tracked<T, F>(
        &self,
        kind: ActivityKind,
        id: &RecordId,
        pending: &str,
        success: &str,
        op: F,
    ) -> SdkResult<T>
    where
        F: Future<Output = SdkResult<T>>,
    {
        lock(&self.banner).pending(pending);
        let result = op.await;
        let now = Instant::now();
        let outcome = match &result {
            Ok(_) => {
                lock(&self.banner).succeed(success, now);
                Outcome::Succeeded
            }
            Err(e) => {
                lock(&self.banner).fail(e.user_message(), now);
                if e.is_user_rejected() {
                    info!(%id, %kind, "cancelled by user");
                    Outcome::Cancelled
                } else {
                    warn!(%id, %kind, error = %e, "operation failed");
                    Outcome::Failed(e.to_string())
                }
            }
        };
        lock(&self.activity).push(Activity {
            at: Timestamp::now(),
            kind,
            id: id.clone(),
            outcome,
        });
        result
    }
}

/// Marks a record as having a reveal in flight until dropped.
struct PendingReveal<'a> {
    set: &'a Mutex<HashSet<RecordId>>,
    id: RecordId,
}

impl<'a> PendingReveal<'a> {
    fn claim(set: &'a Mutex<HashSet<RecordId>>, id: &RecordId) -> SdkResult<Self> {
        if !lock(set).insert(id.clone()) {
            return Err(SdkError::RevealPending(id.clone()));
        }
        Ok(Self {
            set,
            id: id.clone(),
        })
    }
}

impl Drop for PendingReveal<'_> {
    fn drop(&mut self) {
        lock(self.set).remove(&self.id);
    }
}
