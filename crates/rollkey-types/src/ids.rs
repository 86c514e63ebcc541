//! Identifiers for receipts and inventory records

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::KeyError;
use crate::key::KeyComponent;

/// Opaque token minted once per check-in attempt.
///
/// Names the escrowed payload, and becomes the next key component when a
/// client is told to come back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Receipt(String);

impl Receipt {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into a key component so it can be appended to a key.
    pub fn to_component(&self) -> Result<KeyComponent, KeyError> {
        KeyComponent::new(self.0.clone())
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inventory identifier assigned once at record creation.
///
/// Never changes across re-keying; other systems depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StableId(u64);

impl StableId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for StableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "system-{}", self.0)
    }
}
