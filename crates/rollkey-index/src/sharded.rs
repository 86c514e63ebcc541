//! Lineage index sharded by first key component
//!
//! Lineages never cross a first-component boundary, so every key sharing a
//! first component lands in the same shard and a per-shard lock is enough to
//! make test-then-extend atomic for any prefix. One shard is a global lock.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use parking_lot::Mutex;
use rollkey_types::Key;

use crate::lineage::{LineageIndex, PrefixSnapshot};

/// Default number of shards
pub const DEFAULT_SHARD_COUNT: usize = 16;

/// A set of lineage trees, each behind its own mutex
pub struct ShardedLineageIndex {
    shards: Vec<Mutex<LineageIndex>>,
}

impl ShardedLineageIndex {
    /// Create an index with `shard_count` shards (at least one).
    pub fn new(shard_count: usize) -> Self {
        let shards = (0..shard_count.max(1))
            .map(|_| Mutex::new(LineageIndex::new()))
            .collect();
        Self { shards }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    #[inline]
    pub fn shard_for(&self, key: &Key) -> usize {
        let mut hasher = DefaultHasher::new();
        key.first().hash(&mut hasher);
        (hasher.finish() as usize) % self.shards.len()
    }

    /// Run `f` with exclusive access to the shard owning `key`.
    ///
    /// The lock is held for the duration of `f` only; `f` must not block.
    pub fn with_shard<R>(&self, key: &Key, f: impl FnOnce(&mut LineageIndex) -> R) -> R {
        let mut shard = self.shards[self.shard_for(key)].lock();
        f(&mut shard)
    }

    pub fn snapshot(&self, key: &Key) -> PrefixSnapshot {
        self.with_shard(key, |index| index.snapshot(key))
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.with_shard(key, |index| index.contains(key))
    }

    /// Total issued prefixes across all shards.
    pub fn node_count(&self) -> usize {
        self.shards.iter().map(|s| s.lock().node_count()).sum()
    }
}

impl Default for ShardedLineageIndex {
    fn default() -> Self {
        Self::new(DEFAULT_SHARD_COUNT)
    }
}

impl fmt::Display for ShardedLineageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for shard in &self.shards {
            write!(f, "{}", shard.lock())?;
        }
        Ok(())
    }
}

impl fmt::Debug for ShardedLineageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardedLineageIndex")
            .field("shards", &self.shards.len())
            .finish()
    }
}
