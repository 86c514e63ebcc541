//! Check-in events and counters.

use std::sync::atomic::{AtomicU64, Ordering};

use rollkey_types::{Key, Outcome, Receipt, StableId};
use serde::{Deserialize, Serialize};

/// Events emitted by the reconciliation engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInEvent {
    /// A check-in was classified and its side effects applied.
    Reconciled {
        presented_key: Key,
        outcome: Outcome,
        key: Key,
        receipt: Receipt,
        stable_id: Option<StableId>,
    },

    /// A check-in failed; some side effects may already have been applied.
    Failed { presented_key: Key, reason: String },
}

/// Running per-outcome counters.
#[derive(Debug, Default)]
pub struct EngineStats {
    new_systems: AtomicU64,
    routine_checkins: AtomicU64,
    come_backs: AtomicU64,
    fast_forwards: AtomicU64,
    failures: AtomicU64,
}

impl EngineStats {
    pub fn record(&self, outcome: Outcome) {
        let counter = match outcome {
            Outcome::NewSystem => &self.new_systems,
            Outcome::RoutineCheckIn => &self.routine_checkins,
            Outcome::ComeBack => &self.come_backs,
            Outcome::FastForward => &self.fast_forwards,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            new_systems: self.new_systems.load(Ordering::Relaxed),
            routine_checkins: self.routine_checkins.load(Ordering::Relaxed),
            come_backs: self.come_backs.load(Ordering::Relaxed),
            fast_forwards: self.fast_forwards.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`EngineStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub new_systems: u64,
    pub routine_checkins: u64,
    pub come_backs: u64,
    pub fast_forwards: u64,
    pub failures: u64,
}
