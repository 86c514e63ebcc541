//! Check-in classification.
//!
//! Classification is a pure function over a [`PrefixSnapshot`] taken before
//! the index is touched. The index mutation it calls for is applied
//! afterwards, so the child-count test can never observe the caller's own
//! extension.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rollkey_index::PrefixSnapshot;

/// What the lineage index says about a presented key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No prefix of the key is known; the repository decides between a new
    /// system and a routine check-in.
    Unseen,

    /// Exact match on a lineage tip seen within the suspicion window.
    SuspectedClone,

    /// Exact match on a lineage tip seen longer ago than the suspicion window.
    Refresh,

    /// Exact match on a key that something has already been issued past.
    Superseded,

    /// The key continues a matched node that had no children.
    Continuation,

    /// The key branches off a matched node that already had children.
    Divergence,
}

/// Index change owed by a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMutation {
    /// Extend the matched node with the unmatched remainder.
    Extend,

    /// Refresh the timestamp of the exactly matched node.
    Touch,

    None,
}

impl Classification {
    pub fn index_mutation(&self) -> IndexMutation {
        match self {
            Classification::Unseen | Classification::Continuation | Classification::Divergence => {
                IndexMutation::Extend
            }
            Classification::Refresh => IndexMutation::Touch,
            Classification::SuspectedClone | Classification::Superseded => IndexMutation::None,
        }
    }
}

/// Classify a check-in from the pre-mutation snapshot of its key.
pub fn classify(snapshot: &PrefixSnapshot, now: DateTime<Utc>, window: Duration) -> Classification {
    if snapshot.is_root() {
        return Classification::Unseen;
    }

    if snapshot.is_exact() {
        if snapshot.child_count > 0 {
            return Classification::Superseded;
        }
        return match snapshot.last_seen {
            Some(last_seen) if within_window(last_seen, now, window) => {
                Classification::SuspectedClone
            }
            _ => Classification::Refresh,
        };
    }

    if snapshot.child_count == 0 {
        Classification::Continuation
    } else {
        Classification::Divergence
    }
}

/// A `last_seen` in the future (clock skew) counts as within the window.
fn within_window(last_seen: DateTime<Utc>, now: DateTime<Utc>, window: Duration) -> bool {
    match now.signed_duration_since(last_seen).to_std() {
        Ok(elapsed) => elapsed < window,
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(1);

    fn snapshot(
        matched_depth: usize,
        remainder_len: usize,
        child_count: usize,
        last_seen: Option<DateTime<Utc>>,
    ) -> PrefixSnapshot {
        PrefixSnapshot {
            matched_depth,
            remainder_len,
            child_count,
            last_seen,
        }
    }

    #[test]
    fn test_unknown_key_is_unseen() {
        let now = Utc::now();
        assert_eq!(
            classify(&snapshot(0, 2, 5, None), now, WINDOW),
            Classification::Unseen
        );
    }

    #[test]
    fn test_exact_tip_inside_window_is_suspected_clone() {
        let now = Utc::now();
        let last_seen = now - chrono::Duration::milliseconds(200);
        assert_eq!(
            classify(&snapshot(1, 0, 0, Some(last_seen)), now, WINDOW),
            Classification::SuspectedClone
        );
    }

    #[test]
    fn test_exact_tip_outside_window_is_refresh() {
        let now = Utc::now();
        let last_seen = now - chrono::Duration::seconds(2);
        assert_eq!(
            classify(&snapshot(1, 0, 0, Some(last_seen)), now, WINDOW),
            Classification::Refresh
        );

        // The boundary itself is outside the window
        let last_seen = now - chrono::Duration::seconds(1);
        assert_eq!(
            classify(&snapshot(1, 0, 0, Some(last_seen)), now, WINDOW),
            Classification::Refresh
        );
    }

    #[test]
    fn test_future_last_seen_is_suspicious() {
        let now = Utc::now();
        let last_seen = now + chrono::Duration::seconds(30);
        assert_eq!(
            classify(&snapshot(1, 0, 0, Some(last_seen)), now, WINDOW),
            Classification::SuspectedClone
        );
    }

    #[test]
    fn test_exact_match_with_children_is_superseded() {
        let now = Utc::now();
        let long_ago = now - chrono::Duration::days(30);
        assert_eq!(
            classify(&snapshot(2, 0, 1, Some(long_ago)), now, WINDOW),
            Classification::Superseded
        );
    }

    #[test]
    fn test_partial_match_on_childless_node_is_continuation() {
        let now = Utc::now();
        assert_eq!(
            classify(&snapshot(1, 1, 0, Some(now)), now, WINDOW),
            Classification::Continuation
        );
    }

    #[test]
    fn test_partial_match_on_extended_node_is_divergence() {
        let now = Utc::now();
        assert_eq!(
            classify(&snapshot(1, 1, 1, Some(now)), now, WINDOW),
            Classification::Divergence
        );
    }

    #[test]
    fn test_index_mutations() {
        assert_eq!(
            Classification::Unseen.index_mutation(),
            IndexMutation::Extend
        );
        assert_eq!(
            Classification::Refresh.index_mutation(),
            IndexMutation::Touch
        );
        assert_eq!(
            Classification::SuspectedClone.index_mutation(),
            IndexMutation::None
        );
        assert_eq!(
            Classification::Superseded.index_mutation(),
            IndexMutation::None
        );
        assert_eq!(
            Classification::Continuation.index_mutation(),
            IndexMutation::Extend
        );
    }
}
