//! Shared fixtures for engine integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use rollkey_engine::{EngineConfig, ManualClock, ReconciliationEngine, SequentialReceiptGenerator};
use rollkey_registry::{InMemoryEscrowStore, InMemoryRecordRepository};
use rollkey_types::{CheckInRequest, Key, Payload, Receipt};

pub const WINDOW: Duration = Duration::from_secs(1);

pub struct Fleet {
    pub engine: Arc<ReconciliationEngine>,
    pub repository: Arc<InMemoryRecordRepository>,
    pub escrow: Arc<InMemoryEscrowStore>,
    pub clock: Arc<ManualClock>,
    pub announced: Arc<Mutex<Vec<Receipt>>>,
}

pub fn fleet(shard_count: usize) -> Fleet {
    let repository = Arc::new(InMemoryRecordRepository::new());
    let escrow = Arc::new(InMemoryEscrowStore::new());
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let announced = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&announced);
    let announcer = move |r: &Receipt| sink.lock().push(r.clone());

    let config = EngineConfig::default()
        .with_suspicion_window(WINDOW)
        .with_shard_count(shard_count);

    let engine = ReconciliationEngine::new(
        config,
        repository.clone(),
        escrow.clone(),
        Arc::new(announcer),
    )
    .expect("valid config")
    .with_clock(clock.clone())
    .with_receipts(Arc::new(SequentialReceiptGenerator::default()));

    Fleet {
        engine: Arc::new(engine),
        repository,
        escrow,
        clock,
        announced,
    }
}

pub fn key(raw: &str) -> Key {
    Key::parse(raw).expect("valid key")
}

pub fn payload(data: &str) -> CheckInRequest {
    CheckInRequest::Payload(Payload::new(data.as_bytes().to_vec()))
}
