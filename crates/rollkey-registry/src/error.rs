//! Registry error types

use rollkey_types::Key;
use thiserror::Error;

/// Registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("key already exists: {0}")]
    KeyCollision(Key),

    #[error("key doesn't exist: {0}")]
    UnknownKey(Key),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
