//! Rollkey Types - Core types for rolling identifiers
//!
//! A client checking in with the fleet service presents a rolling [`Key`]: an
//! append-only chain of components that records every re-issuance its
//! identity lineage has gone through. Cloning a machine or restoring a backup
//! produces two live clients presenting the same chain, and the service
//! re-keys the suspect one instead of merging both into one record.
//!
//! ## Key Concepts
//!
//! - **Key**: Ordered, non-empty sequence of [`KeyComponent`]s, serialized as
//!   `a:b:c` only at the boundary
//! - **Receipt**: Opaque token naming an escrowed payload; doubles as the next
//!   key component handed to a client told to come back
//! - **SystemRecord**: Inventory entry with a [`StableId`] that survives
//!   every re-keying
//! - **CheckInRequest / CheckInResponse**: The messages exchanged on each
//!   check-in

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod checkin;
pub mod error;
pub mod ids;
pub mod key;
pub mod record;

// Re-export main types
pub use checkin::{CheckInRequest, CheckInResponse, Outcome};
pub use error::KeyError;
pub use ids::{Receipt, StableId};
pub use key::{Key, KeyComponent, KEY_DELIMITER};
pub use record::{Payload, SystemRecord};
