//! Rollkey Engine - Check-in reconciliation for rolling identifiers
//!
//! Given the key a client presents and what it sends along, the engine
//! decides whether this is a new system, a routine refresh, a suspected
//! clone that must adopt a new key, or the confirmed return of such a clone.
//!
//! ## Decision Procedure
//!
//! 1. Longest-prefix match the key against the lineage index
//! 2. Nothing matched: the repository decides between new system and routine
//!    check-in; the whole key is seeded into the index
//! 3. Whole key matched: a childless tip seen within the suspicion window is
//!    a suspected clone; a childless tip seen earlier is a routine check-in;
//!    a key that has already been extended is stale and comes back
//! 4. Part of the key matched: a childless node is continued (fast-forward);
//!    a node that already has children is diverged from (new system)
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use rollkey_engine::{EngineConfig, ReconciliationEngine};
//! use rollkey_registry::{InMemoryEscrowStore, InMemoryRecordRepository, TracingAnnouncer};
//! use rollkey_types::{CheckInRequest, Key, Payload};
//!
//! # async fn example() -> rollkey_engine::Result<()> {
//! let engine = ReconciliationEngine::new(
//!     EngineConfig::default(),
//!     Arc::new(InMemoryRecordRepository::new()),
//!     Arc::new(InMemoryEscrowStore::new()),
//!     Arc::new(TracingAnnouncer),
//! )?;
//!
//! let key = Key::parse("host-1")?;
//! let response = engine
//!     .check_in(&key, CheckInRequest::Payload(Payload::from_static(b"archive")))
//!     .await?;
//!
//! if response.come_back {
//!     // Persist response.key, then retry with the receipt
//!     engine
//!         .check_in(&response.key, CheckInRequest::Receipt(response.receipt))
//!         .await?;
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod classify;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod receipts;

// Re-export main types
pub use classify::{classify, Classification, IndexMutation};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{EngineConfig, MAX_EVENT_CAPACITY};
pub use engine::ReconciliationEngine;
pub use error::{EngineError, Result};
pub use events::{CheckInEvent, EngineStats, StatsSnapshot};
pub use receipts::{ReceiptGenerator, SequentialReceiptGenerator, UuidReceiptGenerator};
