//! Engine configuration.
//!
//! Loadable from TOML; every field falls back to its default when omitted.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Largest accepted `event_capacity`.
pub const MAX_EVENT_CAPACITY: usize = 1 << 20;

/// Configuration for the reconciliation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Repeats of an exact key closer together than this are treated as a
    /// possible clone rather than a routine refresh.
    #[serde(rename = "suspicion_window_ms", with = "duration_ms")]
    pub suspicion_window: Duration,

    /// Lineage index shards; 1 serializes every check-in on one lock.
    pub shard_count: usize,

    /// Buffered check-in events per subscriber.
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            suspicion_window: Duration::from_secs(1),
            shard_count: 16,
            event_capacity: 1024,
        }
    }
}

impl EngineConfig {
    pub fn with_suspicion_window(mut self, window: Duration) -> Self {
        self.suspicion_window = window;
        self
    }

    pub fn with_shard_count(mut self, shard_count: usize) -> Self {
        self.shard_count = shard_count;
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: EngineConfig =
            toml::from_str(contents).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.shard_count == 0 {
            return Err(EngineError::Config("shard_count must be at least 1".into()));
        }
        if self.event_capacity == 0 {
            return Err(EngineError::Config(
                "event_capacity must be at least 1".into(),
            ));
        }
        if self.event_capacity > MAX_EVENT_CAPACITY {
            return Err(EngineError::Config(format!(
                "event_capacity must be at most {}",
                MAX_EVENT_CAPACITY
            )));
        }
        Ok(())
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
