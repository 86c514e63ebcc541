//! Rollkey Index - Lineage index for rolling identifiers
//!
//! Every key ever issued is recorded as a path in a prefix tree. The tree
//! only grows: nodes are created by extension and never removed.
//!
//! - **LineageIndex**: A single tree with longest-prefix lookup and extension
//! - **PrefixSnapshot**: Owned view of a lookup, taken before any mutation
//! - **ShardedLineageIndex**: Trees sharded by first key component, each
//!   behind its own lock
//!
//! ## Divergence Signal
//!
//! A node's child count tells the reconciliation engine what happened past
//! it. An exactly matched node without children is the live tip of one
//! lineage. An exactly matched node with children has already been extended
//! by someone else, so whoever presents that key now is stale.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod error;
pub mod lineage;
pub mod sharded;

pub use error::{IndexError, Result};
pub use lineage::{LineageIndex, LineageNode, PrefixMatch, PrefixSnapshot};
pub use sharded::ShardedLineageIndex;
