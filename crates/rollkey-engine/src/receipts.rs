//! Receipt minting.

use std::sync::atomic::{AtomicU64, Ordering};

use rollkey_types::Receipt;

/// Produces a fresh, collision-resistant receipt per check-in attempt.
pub trait ReceiptGenerator: Send + Sync {
    fn mint(&self) -> Receipt;
}

/// Random v4 UUID receipts.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidReceiptGenerator;

impl ReceiptGenerator for UuidReceiptGenerator {
    fn mint(&self) -> Receipt {
        Receipt::generate()
    }
}

/// Predictable receipts (`r1`, `r2`, ...) for tests and walkthroughs.
///
/// Unique only within one generator.
#[derive(Debug)]
pub struct SequentialReceiptGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialReceiptGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialReceiptGenerator {
    fn default() -> Self {
        Self::new("r")
    }
}

impl ReceiptGenerator for SequentialReceiptGenerator {
    fn mint(&self) -> Receipt {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        Receipt::new(format!("{}{}", self.prefix, n))
    }
}
