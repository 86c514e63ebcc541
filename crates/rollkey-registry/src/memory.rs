//! In-memory implementations of registry traits
//!
//! These are suitable for development and testing. Production deployments
//! should use persistent backends.

use crate::error::{RegistryError, Result};
use crate::escrow::EscrowStore;
use crate::repository::RecordRepository;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use rollkey_types::{Key, Payload, Receipt, StableId, SystemRecord};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// In-memory record repository
///
/// Reads go straight to the map. Writes serialize on `writes`, so a rename
/// cannot interleave with another write between its collision check and
/// its insert.
pub struct InMemoryRecordRepository {
    records: DashMap<Key, SystemRecord>,
    writes: Mutex<()>,
    next_id: AtomicU64,
}

impl InMemoryRecordRepository {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            writes: Mutex::new(()),
            next_id: AtomicU64::new(0),
        }
    }

    /// All keys currently holding the record with `stable_id`.
    ///
    /// More than one entry means two live keys were merged into, or split
    /// from, one identity.
    pub fn keys_for(&self, stable_id: StableId) -> Vec<Key> {
        self.records
            .iter()
            .filter(|r| r.value().stable_id == stable_id)
            .map(|r| r.key().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for InMemoryRecordRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordRepository for InMemoryRecordRepository {
    async fn create(&self, key: &Key, payload: Payload) -> Result<SystemRecord> {
        let _writes = self.writes.lock();
        match self.records.entry(key.clone()) {
            Entry::Occupied(_) => Err(RegistryError::KeyCollision(key.clone())),
            Entry::Vacant(slot) => {
                let stable_id = StableId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
                let record = SystemRecord::new(stable_id, payload);
                slot.insert(record.clone());
                debug!(key = %key, stable_id = %stable_id, "Record created");
                Ok(record)
            }
        }
    }

    async fn get(&self, key: &Key) -> Result<Option<SystemRecord>> {
        Ok(self.records.get(key).map(|r| r.clone()))
    }

    async fn update(
        &self,
        old_key: &Key,
        new_key: &Key,
        payload: Payload,
    ) -> Result<SystemRecord> {
        let _writes = self.writes.lock();

        if old_key == new_key {
            let mut record = self
                .records
                .get_mut(old_key)
                .ok_or_else(|| RegistryError::UnknownKey(old_key.clone()))?;
            record.payload = payload;
            return Ok(record.clone());
        }

        if !self.records.contains_key(old_key) {
            return Err(RegistryError::UnknownKey(old_key.clone()));
        }
        if self.records.contains_key(new_key) {
            return Err(RegistryError::KeyCollision(new_key.clone()));
        }

        let (_, previous) = self
            .records
            .remove(old_key)
            .ok_or_else(|| RegistryError::UnknownKey(old_key.clone()))?;
        let record = SystemRecord::new(previous.stable_id, payload);
        self.records.insert(new_key.clone(), record.clone());

        debug!(
            old_key = %old_key,
            new_key = %new_key,
            stable_id = %record.stable_id,
            "Record re-keyed"
        );

        Ok(record)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.len())
    }
}

/// In-memory escrow store
pub struct InMemoryEscrowStore {
    payloads: DashMap<Receipt, Payload>,
}

impl InMemoryEscrowStore {
    pub fn new() -> Self {
        Self {
            payloads: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

impl Default for InMemoryEscrowStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EscrowStore for InMemoryEscrowStore {
    async fn put(&self, receipt: &Receipt, payload: Payload) -> Result<()> {
        self.payloads.insert(receipt.clone(), payload);
        Ok(())
    }

    async fn get(&self, receipt: &Receipt) -> Result<Option<Payload>> {
        Ok(self.payloads.get(receipt).map(|p| p.clone()))
    }
}
