//! Announcement of accepted payloads
//!
//! Announcing is fire-and-forget: the engine never learns whether anyone
//! processed the archive, and a failed announcement is not a failed
//! check-in.

use rollkey_types::Receipt;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Notified with the receipt of every payload accepted into inventory
pub trait Announcer: Send + Sync {
    fn notify(&self, receipt: &Receipt);
}

impl<F> Announcer for F
where
    F: Fn(&Receipt) + Send + Sync,
{
    fn notify(&self, receipt: &Receipt) {
        self(receipt)
    }
}

/// Announces by logging
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAnnouncer;

impl Announcer for TracingAnnouncer {
    fn notify(&self, receipt: &Receipt) {
        info!(receipt = %receipt, "Process this archive");
    }
}

/// Publishes receipts to archive processors over a broadcast channel
pub struct BroadcastAnnouncer {
    tx: broadcast::Sender<Receipt>,
}

impl BroadcastAnnouncer {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Receipt> {
        self.tx.subscribe()
    }
}

impl Announcer for BroadcastAnnouncer {
    fn notify(&self, receipt: &Receipt) {
        if self.tx.send(receipt.clone()).is_err() {
            debug!(receipt = %receipt, "No archive processors subscribed");
        }
    }
}
