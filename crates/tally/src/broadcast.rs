//! Dashboard event broadcasting for downstream consumers.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::dashboard::DashboardSnapshot;

/// Events emitted by the generation scheduler.
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    /// A batch finished and the aggregates were rebuilt.
    Refreshed {
        inserted: usize,
        snapshot: Arc<DashboardSnapshot>,
    },
    /// A batch failed; the scheduler keeps ticking.
    BatchFailed { inserted: usize, error: String },
    /// Every quota is met and the scheduler has stopped itself.
    Completed,
}

/// Broadcasts dashboard events to any number of subscribers.
#[derive(Debug, Clone)]
pub struct SnapshotBroadcast {
    tx: broadcast::Sender<DashboardEvent>,
}

impl SnapshotBroadcast {
    /// Creates a broadcaster that buffers `capacity` events per subscriber.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Sends an event to all subscribers.
    ///
    /// Returns the number of subscribers that received it. Slow subscribers
    /// see `RecvError::Lagged` instead of blocking the sender.
    pub fn send(&self, event: DashboardEvent) -> usize {
        self.tx.send(event).unwrap_or_default()
    }

    /// Subscribes to events sent from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.tx.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for SnapshotBroadcast {
    fn default() -> Self {
        Self::new(64)
    }
}
