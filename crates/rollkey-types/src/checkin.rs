//! Check-in request and response messages
//!
//! A client checks in with its current key and either a fresh payload or the
//! receipt it was handed on a previous come-back. The response tells it
//! whether to adopt a new key and retry.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::{Receipt, StableId};
use crate::key::Key;
use crate::record::Payload;

/// What a client sends alongside its key: exactly one of payload or receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInRequest {
    /// A fresh archive
    Payload(Payload),

    /// A receipt from an earlier come-back; the archive is already escrowed
    Receipt(Receipt),
}

impl CheckInRequest {
    /// The receipt, for requests continuing an earlier come-back.
    pub fn as_receipt(&self) -> Option<&Receipt> {
        match self {
            Self::Receipt(receipt) => Some(receipt),
            Self::Payload(_) => None,
        }
    }
}

/// Classification of a single check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// First contact, or a clone diverging from an already-resolved lineage
    NewSystem,

    /// Known system refreshing its record
    RoutineCheckIn,

    /// Suspected clone; the client must adopt a new key and retry
    ComeBack,

    /// Confirmed continuation of an earlier come-back
    FastForward,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::NewSystem => write!(f, "new_system"),
            Outcome::RoutineCheckIn => write!(f, "routine_checkin"),
            Outcome::ComeBack => write!(f, "come_back"),
            Outcome::FastForward => write!(f, "fast_forward"),
        }
    }
}

/// Reply to a check-in.
///
/// When `come_back` is set the client must persist `key` locally and retry
/// with `CheckInRequest::Receipt(receipt)` instead of resending its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInResponse {
    pub come_back: bool,
    pub receipt: Receipt,
    pub key: Key,
    pub outcome: Outcome,

    /// Inventory identifier of the affected record, when one was touched
    pub stable_id: Option<StableId>,
}

impl CheckInResponse {
    pub fn accepted(outcome: Outcome, key: Key, receipt: Receipt, stable_id: StableId) -> Self {
        Self {
            come_back: false,
            receipt,
            key,
            outcome,
            stable_id: Some(stable_id),
        }
    }

    pub fn come_back(key: Key, receipt: Receipt) -> Self {
        Self {
            come_back: true,
            receipt,
            key,
            outcome: Outcome::ComeBack,
            stable_id: None,
        }
    }
}
