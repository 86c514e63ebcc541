//! Key validation errors

use thiserror::Error;

/// Errors raised while building, parsing, or trimming keys
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("key has no components")]
    Empty,

    #[error("empty key component at position {position}")]
    EmptyComponent { position: usize },

    #[error("key component contains the reserved delimiter: {0:?}")]
    ReservedDelimiter(String),

    #[error("key {key} does not end with suffix {suffix}")]
    SuffixMismatch { key: String, suffix: String },

    #[error("trimming {suffix} would leave key {key} without components")]
    SuffixConsumesKey { key: String, suffix: String },
}
