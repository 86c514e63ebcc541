//! Reconciliation Engine - the check-in decision procedure.
//!
//! Every check-in is classified from scratch against the lineage index and
//! the record repository; the engine keeps no per-client state of its own.
//!
//! | Outcome | Side effects |
//! |---|---|
//! | `NewSystem` | repository create, escrow put, announce |
//! | `RoutineCheckIn` | repository update in place, escrow put, announce |
//! | `ComeBack` | escrow put only |
//! | `FastForward` | escrow get, repository re-key, announce |
//!
//! The index walk, the child-count test, and the index mutation run under
//! the lock of the key's shard. Collaborator calls happen after the lock is
//! released and are not transactional: a failure partway through leaves
//! whatever was already applied in place.

use std::sync::Arc;

use rollkey_index::ShardedLineageIndex;
use rollkey_registry::{Announcer, EscrowStore, RecordRepository};
use rollkey_types::{CheckInRequest, CheckInResponse, Key, Outcome, Payload, Receipt};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use crate::classify::{classify, Classification, IndexMutation};
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::events::{CheckInEvent, EngineStats, StatsSnapshot};
use crate::receipts::{ReceiptGenerator, UuidReceiptGenerator};

/// Classifies check-ins and drives their side effects.
pub struct ReconciliationEngine {
    /// Configuration.
    config: EngineConfig,

    /// Lineage of every key ever issued.
    index: ShardedLineageIndex,

    repository: Arc<dyn RecordRepository>,
    escrow: Arc<dyn EscrowStore>,
    announcer: Arc<dyn Announcer>,
    receipts: Arc<dyn ReceiptGenerator>,
    clock: Arc<dyn Clock>,

    /// Event broadcaster.
    event_tx: broadcast::Sender<CheckInEvent>,

    stats: EngineStats,
}

impl ReconciliationEngine {
    /// Create an engine using the wall clock and UUID receipts.
    pub fn new(
        config: EngineConfig,
        repository: Arc<dyn RecordRepository>,
        escrow: Arc<dyn EscrowStore>,
        announcer: Arc<dyn Announcer>,
    ) -> Result<Self> {
        config.validate()?;

        let (event_tx, _) = broadcast::channel(config.event_capacity);
        let index = ShardedLineageIndex::new(config.shard_count);

        Ok(Self {
            config,
            index,
            repository,
            escrow,
            announcer,
            receipts: Arc::new(UuidReceiptGenerator),
            clock: Arc::new(SystemClock),
            event_tx,
            stats: EngineStats::default(),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_receipts(mut self, receipts: Arc<dyn ReceiptGenerator>) -> Self {
        self.receipts = receipts;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn index(&self) -> &ShardedLineageIndex {
        &self.index
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Subscribe to check-in events.
    pub fn subscribe(&self) -> broadcast::Receiver<CheckInEvent> {
        self.event_tx.subscribe()
    }

    /// Check in with `key`.
    ///
    /// On `Err`, side effects may have been partially applied and nothing
    /// from this attempt may be used for a retry.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn check_in(&self, key: &Key, request: CheckInRequest) -> Result<CheckInResponse> {
        let result = self.reconcile(key, request).await;

        match &result {
            Ok(response) => {
                self.stats.record(response.outcome);
                info!(
                    outcome = %response.outcome,
                    new_key = %response.key,
                    receipt = %response.receipt,
                    "Check-in reconciled"
                );
                let _ = self.event_tx.send(CheckInEvent::Reconciled {
                    presented_key: key.clone(),
                    outcome: response.outcome,
                    key: response.key.clone(),
                    receipt: response.receipt.clone(),
                    stable_id: response.stable_id,
                });
            }
            Err(e) => {
                self.stats.record_failure();
                warn!(error = %e, "Check-in failed");
                let _ = self.event_tx.send(CheckInEvent::Failed {
                    presented_key: key.clone(),
                    reason: e.to_string(),
                });
            }
        }

        result
    }

    async fn reconcile(&self, key: &Key, request: CheckInRequest) -> Result<CheckInResponse> {
        let now = self.clock.now();
        let receipt = self.receipts.mint();
        let window = self.config.suspicion_window;

        // Snapshot, classify, then mutate: all under the shard lock
        let (snapshot, classification) = self.index.with_shard(key, |index| {
            let snapshot = index.snapshot(key);
            let classification = classify(&snapshot, now, window);

            // Only the receipt holder may continue a tip
            if classification == Classification::Continuation && request.as_receipt().is_none() {
                return Err(EngineError::MissingReceipt(key.clone()));
            }

            match classification.index_mutation() {
                IndexMutation::Extend => {
                    index.extend_from(key, snapshot.matched_depth, now)?;
                }
                IndexMutation::Touch => index.touch(key, now)?,
                IndexMutation::None => {}
            }
            Ok::<_, EngineError>((snapshot, classification))
        })?;

        debug!(
            matched_depth = snapshot.matched_depth,
            remainder = snapshot.remainder_len,
            children = snapshot.child_count,
            classification = ?classification,
            "Lineage classified"
        );

        match classification {
            Classification::Unseen => {
                if self.repository.exists(key).await? {
                    self.routine_check_in(key, request, receipt).await
                } else {
                    self.new_system(key, request, receipt).await
                }
            }
            Classification::Refresh => self.routine_check_in(key, request, receipt).await,
            Classification::SuspectedClone | Classification::Superseded => {
                self.come_back(key, request, receipt).await
            }
            Classification::Continuation => {
                self.fast_forward(key, snapshot.matched_depth, request).await
            }
            Classification::Divergence => self.new_system(key, request, receipt).await,
        }
    }

    /// The request's payload, recovered from escrow when a receipt was sent.
    async fn resolve_payload(&self, request: CheckInRequest) -> Result<Payload> {
        match request {
            CheckInRequest::Payload(payload) => Ok(payload),
            CheckInRequest::Receipt(receipt) => match self.escrow.get(&receipt).await? {
                Some(payload) => Ok(payload),
                None => {
                    warn!(receipt = %receipt, "Escrowed payload missing");
                    Err(EngineError::EscrowMiss(receipt))
                }
            },
        }
    }

    /// Always under a freshly minted receipt, even when the request carried one.
    async fn new_system(
        &self,
        key: &Key,
        request: CheckInRequest,
        receipt: Receipt,
    ) -> Result<CheckInResponse> {
        let payload = self.resolve_payload(request).await?;
        let record = self.repository.create(key, payload.clone()).await?;
        self.escrow.put(&receipt, payload).await?;
        self.announcer.notify(&receipt);

        Ok(CheckInResponse::accepted(
            Outcome::NewSystem,
            key.clone(),
            receipt,
            record.stable_id,
        ))
    }

    async fn routine_check_in(
        &self,
        key: &Key,
        request: CheckInRequest,
        receipt: Receipt,
    ) -> Result<CheckInResponse> {
        let payload = self.resolve_payload(request).await?;
        let record = self.repository.update(key, key, payload.clone()).await?;
        self.escrow.put(&receipt, payload).await?;
        self.announcer.notify(&receipt);

        Ok(CheckInResponse::accepted(
            Outcome::RoutineCheckIn,
            key.clone(),
            receipt,
            record.stable_id,
        ))
    }

    /// Hold the payload and hand out `key` extended by the receipt. The
    /// index is only extended once the client actually comes back.
    async fn come_back(
        &self,
        key: &Key,
        request: CheckInRequest,
        receipt: Receipt,
    ) -> Result<CheckInResponse> {
        let next_key = key.extend(receipt.to_component()?);
        let payload = self.resolve_payload(request).await?;
        self.escrow.put(&receipt, payload).await?;

        Ok(CheckInResponse::come_back(next_key, receipt))
    }

    /// Re-key the record from the ancestor at `matched_depth` to `key`,
    /// using the payload escrowed under the presented receipt.
    async fn fast_forward(
        &self,
        key: &Key,
        matched_depth: usize,
        request: CheckInRequest,
    ) -> Result<CheckInResponse> {
        let prior_key = key.trim_suffix(&key.components()[matched_depth..])?;
        let receipt = request
            .as_receipt()
            .cloned()
            .ok_or_else(|| EngineError::MissingReceipt(key.clone()))?;

        if receipt.as_str() != key.last().as_str() {
            warn!(
                receipt = %receipt,
                continues = %key.last(),
                "Receipt differs from the key component it continues"
            );
        }

        let payload = self.resolve_payload(request).await?;
        let record = self.repository.update(&prior_key, key, payload).await?;
        self.announcer.notify(&receipt);

        Ok(CheckInResponse::accepted(
            Outcome::FastForward,
            key.clone(),
            receipt,
            record.stable_id,
        ))
    }
}
