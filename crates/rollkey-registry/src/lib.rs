//! Rollkey Registry - Collaborators consumed by the reconciliation engine
//!
//! This crate provides the stores the engine drives on every check-in:
//!
//! - **RecordRepository**: Inventory records keyed by current rolling key
//! - **EscrowStore**: Payloads held under a receipt until identity is settled
//! - **Announcer**: Fire-and-forget notification of accepted payloads
//!
//! ## Locking
//!
//! Each store guards itself. Their operations are not atomic with the
//! lineage index decision, nor with each other. Within the repository,
//! writes are serialized so a rename never clobbers a concurrently created
//! record.
//!
//! ## In-Memory vs Persistent
//!
//! The in-memory implementations are suitable for development and testing.
//! Production deployments should back the same traits with durable storage.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod announce;
pub mod error;
pub mod escrow;
pub mod memory;
pub mod repository;

// Re-exports
pub use announce::{Announcer, BroadcastAnnouncer, TracingAnnouncer};
pub use error::{RegistryError, Result};
pub use escrow::EscrowStore;
pub use memory::{InMemoryEscrowStore, InMemoryRecordRepository};
pub use repository::RecordRepository;
