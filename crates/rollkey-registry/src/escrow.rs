//! Escrow store trait
//!
//! Payloads are held here under their receipt so a client told to come back
//! never has to upload the same archive twice.

use crate::error::Result;
use async_trait::async_trait;
use rollkey_types::{Payload, Receipt};

/// Temporary store of payloads pending identity confirmation
#[async_trait]
pub trait EscrowStore: Send + Sync {
    /// Hold `payload` under `receipt`
    async fn put(&self, receipt: &Receipt, payload: Payload) -> Result<()>;

    /// Look up the payload held under `receipt`
    async fn get(&self, receipt: &Receipt) -> Result<Option<Payload>>;
}
