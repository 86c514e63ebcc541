//! Index error types

use thiserror::Error;

/// Lineage index errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("extension requires at least one component")]
    EmptyExtension,

    #[error("no lineage node at {0}")]
    NodeNotFound(String),

    #[error("prefix depth {depth} exceeds key {key}")]
    DepthOutOfRange { key: String, depth: usize },
}

/// Result type for index operations
pub type Result<T> = std::result::Result<T, IndexError>;
