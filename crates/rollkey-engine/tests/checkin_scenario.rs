//! End-to-end check-in lineage scenarios.

mod support;

use std::sync::Arc;
use std::time::Duration;

use rollkey_engine::{EngineConfig, ReconciliationEngine, SequentialReceiptGenerator};
use rollkey_registry::{
    InMemoryEscrowStore, InMemoryRecordRepository, RecordRepository, TracingAnnouncer,
};
use rollkey_types::{CheckInRequest, Outcome, Payload, Receipt};
use support::{fleet, key, payload};

#[tokio::test]
async fn test_clone_detection_walkthrough() {
    let f = fleet(16);

    // First contact
    let first = f.engine.check_in(&key("1"), payload("P1")).await.unwrap();
    assert_eq!(first.outcome, Outcome::NewSystem);
    assert_eq!(first.key, key("1"));
    assert!(!first.come_back);
    let stable_id = first.stable_id.unwrap();

    // Immediate repeat: suspected clone
    let repeat = f.engine.check_in(&key("1"), payload("P1")).await.unwrap();
    assert_eq!(repeat.outcome, Outcome::ComeBack);
    assert!(repeat.come_back);
    let r1 = repeat.receipt.clone();
    assert_eq!(repeat.key, key(&format!("1:{}", r1)));

    // Come back with the new key and the receipt only
    let forwarded = f
        .engine
        .check_in(&repeat.key, CheckInRequest::Receipt(r1.clone()))
        .await
        .unwrap();
    assert_eq!(forwarded.outcome, Outcome::FastForward);
    assert_eq!(forwarded.receipt, r1);
    assert!(!forwarded.come_back);

    let record = f.repository.get(&repeat.key).await.unwrap().unwrap();
    assert_eq!(record.stable_id, stable_id);
    assert_eq!(record.payload, Payload::new(b"P1".to_vec()));
    assert!(f.repository.get(&key("1")).await.unwrap().is_none());

    // Outside the suspicion window: routine refresh with a new payload
    f.clock.advance(Duration::from_secs(2));
    let routine = f.engine.check_in(&repeat.key, payload("P2")).await.unwrap();
    assert_eq!(routine.outcome, Outcome::RoutineCheckIn);
    assert!(!routine.come_back);
    assert_eq!(routine.stable_id, Some(stable_id));

    let record = f.repository.get(&repeat.key).await.unwrap().unwrap();
    assert_eq!(record.stable_id, stable_id);
    assert_eq!(record.payload, Payload::new(b"P2".to_vec()));

    // Announced: new system, fast-forward, routine; never the come-back
    let announced = f.announced.lock().clone();
    assert_eq!(announced, vec![first.receipt, r1, routine.receipt]);

    let stats = f.engine.stats();
    assert_eq!(stats.new_systems, 1);
    assert_eq!(stats.come_backs, 1);
    assert_eq!(stats.fast_forwards, 1);
    assert_eq!(stats.routine_checkins, 1);
    assert_eq!(stats.failures, 0);
}

#[tokio::test]
async fn test_stable_id_survives_many_rekeyings() {
    let f = fleet(4);
    let created = f.engine.check_in(&key("host"), payload("v0")).await.unwrap();
    let stable_id = created.stable_id.unwrap();

    let mut current = created.key;
    for generation in 1..=10 {
        f.clock.advance(Duration::from_millis(100));
        let come_back = f
            .engine
            .check_in(&current, payload(&format!("v{}", generation)))
            .await
            .unwrap();
        assert_eq!(come_back.outcome, Outcome::ComeBack);

        let forwarded = f
            .engine
            .check_in(&come_back.key, CheckInRequest::Receipt(come_back.receipt))
            .await
            .unwrap();
        assert_eq!(forwarded.outcome, Outcome::FastForward);
        assert_eq!(forwarded.stable_id, Some(stable_id));
        current = come_back.key;

        f.clock.advance(Duration::from_secs(5));
        let routine = f.engine.check_in(&current, payload("steady")).await.unwrap();
        assert_eq!(routine.outcome, Outcome::RoutineCheckIn);
        assert_eq!(routine.stable_id, Some(stable_id));
    }

    assert_eq!(current.depth(), 11);
    assert_eq!(f.repository.keys_for(stable_id), vec![current]);
    assert_eq!(f.repository.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_restored_backup_is_split_off() {
    let f = fleet(16);
    f.engine.check_in(&key("vm"), payload("a")).await.unwrap();
    let come_back = f.engine.check_in(&key("vm"), payload("a")).await.unwrap();
    f.engine
        .check_in(&come_back.key, CheckInRequest::Receipt(come_back.receipt))
        .await
        .unwrap();

    // A backup taken before the re-key is restored weeks later
    f.clock.advance(Duration::from_secs(60 * 60 * 24 * 21));
    let stale = f.engine.check_in(&key("vm"), payload("backup")).await.unwrap();
    assert_eq!(stale.outcome, Outcome::ComeBack);

    let split = f
        .engine
        .check_in(&stale.key, CheckInRequest::Receipt(stale.receipt.clone()))
        .await
        .unwrap();
    assert_eq!(split.outcome, Outcome::NewSystem);
    assert_ne!(split.receipt, stale.receipt);
    assert_eq!(f.repository.len(), 2);

    let backup = f.repository.get(&stale.key).await.unwrap().unwrap();
    assert_eq!(backup.payload, Payload::new(b"backup".to_vec()));
}

#[tokio::test]
async fn test_escrow_is_written_on_every_accepted_or_deferred_checkin() {
    let f = fleet(1);
    let first = f.engine.check_in(&key("e"), payload("x")).await.unwrap();
    let deferred = f.engine.check_in(&key("e"), payload("y")).await.unwrap();

    assert_eq!(f.escrow.len(), 2);
    assert!(f.announced.lock().contains(&first.receipt));
    assert!(!f.announced.lock().contains(&deferred.receipt));
}

#[tokio::test]
async fn test_wall_clock_window() {
    let repository = Arc::new(InMemoryRecordRepository::new());
    let engine = ReconciliationEngine::new(
        EngineConfig::default().with_suspicion_window(Duration::from_millis(50)),
        repository.clone(),
        Arc::new(InMemoryEscrowStore::new()),
        Arc::new(TracingAnnouncer),
    )
    .unwrap()
    .with_receipts(Arc::new(SequentialReceiptGenerator::new("w")));

    let first = engine.check_in(&key("w"), payload("a")).await.unwrap();
    assert_eq!(first.receipt, Receipt::new("w1"));

    tokio::time::sleep(Duration::from_millis(120)).await;
    let later = engine.check_in(&key("w"), payload("b")).await.unwrap();
    assert_eq!(later.outcome, Outcome::RoutineCheckIn);
}
