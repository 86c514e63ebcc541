//! Error types for the reconciliation engine.
//!
//! Each variant is a distinct failure class callers can branch on. A failed
//! check-in yields no response: nothing from it may be used for a retry.

use rollkey_index::IndexError;
use rollkey_registry::RegistryError;
use rollkey_types::{Key, KeyError, Receipt};
use thiserror::Error;

/// Errors that can occur during a check-in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Record creation hit an occupied key.
    #[error("key collision: {0}")]
    KeyCollision(Key),

    /// Record update referenced a missing key.
    #[error("unknown key: {0}")]
    UnknownKey(Key),

    /// No escrowed payload under the presented receipt.
    #[error("no escrowed payload for receipt {0}")]
    EscrowMiss(Receipt),

    /// A key continuing a lineage tip arrived without the receipt that
    /// issued it.
    #[error("continuation of {0} requires a receipt")]
    MissingReceipt(Key),

    /// Key could not be built or trimmed.
    #[error("invalid key: {0}")]
    InvalidKey(#[from] KeyError),

    /// Lineage index rejected a mutation.
    #[error("lineage index error: {0}")]
    Index(#[from] IndexError),

    /// Collaborator storage failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<RegistryError> for EngineError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::KeyCollision(key) => EngineError::KeyCollision(key),
            RegistryError::UnknownKey(key) => EngineError::UnknownKey(key),
            RegistryError::Storage(reason) => EngineError::Storage(reason),
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
