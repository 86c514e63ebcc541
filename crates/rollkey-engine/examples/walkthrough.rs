//! Walkthrough: one system checking in, being cloned, and coming back.
//!
//! ```bash
//! RUST_LOG=debug cargo run -p rollkey-engine --example walkthrough
//! ```

use std::sync::Arc;

use rollkey_engine::{EngineConfig, ReconciliationEngine, Result};
use rollkey_registry::{
    EscrowStore, InMemoryEscrowStore, InMemoryRecordRepository, TracingAnnouncer,
};
use rollkey_types::{CheckInRequest, CheckInResponse, Key, Payload};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let config = EngineConfig::default();
    let window = config.suspicion_window;
    let escrow = Arc::new(InMemoryEscrowStore::new());
    let engine = ReconciliationEngine::new(
        config,
        Arc::new(InMemoryRecordRepository::new()),
        escrow.clone(),
        Arc::new(TracingAnnouncer),
    )?;

    let archive = CheckInRequest::Payload(Payload::from_static(b"{\"hostname\":\"web-1\"}"));
    let first_key = Key::parse("1")?;

    let response = engine.check_in(&first_key, archive.clone()).await?;
    show(&engine, &response);

    // Same key again, well inside the suspicion window
    let response = engine.check_in(&first_key, archive).await?;
    show(&engine, &response);

    if !response.come_back {
        println!("Expected a come-back response");
        return Ok(());
    }

    // Return with the issued key and only the receipt
    let response = engine
        .check_in(&response.key, CheckInRequest::Receipt(response.receipt.clone()))
        .await?;
    show(&engine, &response);

    // The archive was never uploaded twice
    if let Some(archive) = escrow.get(&response.receipt).await? {
        println!("escrowed archive: {}", String::from_utf8_lossy(archive.as_bytes()));
    }

    // Wait out the window; the next check-in is routine
    tokio::time::sleep(window * 2).await;
    let response = engine
        .check_in(
            &response.key,
            CheckInRequest::Payload(Payload::from_static(b"{\"hostname\":\"web-1\",\"uptime\":2}")),
        )
        .await?;
    show(&engine, &response);

    println!("{:?}", engine.stats());
    Ok(())
}

fn show(engine: &ReconciliationEngine, response: &CheckInResponse) {
    println!(
        "outcome={} come_back={} key={} receipt={}",
        response.outcome, response.come_back, response.key, response.receipt
    );
    print!("{}", engine.index());
    println!();
}
