//! Payloads and inventory records

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::ids::StableId;

/// Opaque archive uploaded by a checking-in client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Payload(Bytes);

impl Payload {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self(data.into())
    }

    pub fn from_static(data: &'static [u8]) -> Self {
        Self(Bytes::from_static(data))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Payload {
    fn from(data: Vec<u8>) -> Self {
        Self(Bytes::from(data))
    }
}

impl From<Bytes> for Payload {
    fn from(data: Bytes) -> Self {
        Self(data)
    }
}

/// Inventory entry stored under a system's current rolling key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemRecord {
    pub stable_id: StableId,
    pub payload: Payload,
}

impl SystemRecord {
    pub fn new(stable_id: StableId, payload: Payload) -> Self {
        Self { stable_id, payload }
    }
}
