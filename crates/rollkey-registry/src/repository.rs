//! Record repository trait
//!
//! The RecordRepository stores one [`SystemRecord`] per live rolling key.

use crate::error::Result;
use async_trait::async_trait;
use rollkey_types::{Key, Payload, SystemRecord};

/// Inventory of systems keyed by their current rolling key
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Create a record under `key`, assigning a fresh stable identifier.
    ///
    /// Fails with `KeyCollision` if `key` is already present.
    async fn create(&self, key: &Key, payload: Payload) -> Result<SystemRecord>;

    /// Get the record stored under `key`
    async fn get(&self, key: &Key) -> Result<Option<SystemRecord>>;

    /// Move the record at `old_key` to `new_key` and replace its payload,
    /// keeping its stable identifier.
    ///
    /// Fails with `UnknownKey` if `old_key` is absent, and with
    /// `KeyCollision` if `new_key` differs from `old_key` and is occupied.
    /// Implementations must make the occupancy check and the rename atomic
    /// with respect to other writes.
    async fn update(&self, old_key: &Key, new_key: &Key, payload: Payload)
        -> Result<SystemRecord>;

    /// Number of live records
    async fn count(&self) -> Result<usize>;

    /// Check if a record exists under `key`
    async fn exists(&self, key: &Key) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }
}
