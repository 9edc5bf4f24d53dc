//! In-process change feed backed by a `tokio::sync::broadcast` channel.
//!
//! [`ChangeFeed`] is the hub behind the real-time client subscriptions:
//! admin mutations publish a [`TableChange`] and every connected WebSocket
//! session receives it, prompting a refetch of the affected view. It is
//! designed to be shared via `Arc<ChangeFeed>` across the application.

use serde::Serialize;
use tokio::sync::broadcast;

use perkflow_core::types::Timestamp;

/// Tables the feed reports on.
pub mod tables {
    pub const QUESTIONS: &str = "questions";
    pub const COUPONS: &str = "coupons";
    pub const PARTNERS: &str = "partners";
}

/// The kind of change that happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

/// A table-level change notice.
#[derive(Debug, Clone, Serialize)]
pub struct TableChange {
    pub table: &'static str,
    pub op: ChangeOp,
    pub entity_id: Option<uuid::Uuid>,
    pub at: Timestamp,
}

impl TableChange {
    pub fn new(table: &'static str, op: ChangeOp, entity_id: Option<uuid::Uuid>) -> Self {
        Self {
            table,
            op,
            entity_id,
            at: chrono::Utc::now(),
        }
    }
}

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out hub for table change notices.
pub struct ChangeFeed {
    sender: broadcast::Sender<TableChange>,
}

impl ChangeFeed {
    /// Create a feed with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed notices are dropped
    /// and slow receivers observe a `RecvError::Lagged`; a lagged client
    /// simply refetches everything.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a change to all current subscribers.
    ///
    /// If there are no active subscribers the notice is silently dropped.
    pub fn publish(&self, change: TableChange) {
        let _ = self.sender.send(change);
    }

    /// Subscribe to all changes published on this feed.
    pub fn subscribe(&self) -> broadcast::Receiver<TableChange> {
        self.sender.subscribe()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let feed = ChangeFeed::default();
        let mut rx = feed.subscribe();

        let id = uuid::Uuid::new_v4();
        feed.publish(TableChange::new(tables::COUPONS, ChangeOp::Insert, Some(id)));

        let received = rx.recv().await.expect("should receive the notice");
        assert_eq!(received.table, tables::COUPONS);
        assert_eq!(received.op, ChangeOp::Insert);
        assert_eq!(received.entity_id, Some(id));
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_the_same_notice() {
        let feed = ChangeFeed::default();
        let mut rx1 = feed.subscribe();
        let mut rx2 = feed.subscribe();

        feed.publish(TableChange::new(tables::QUESTIONS, ChangeOp::Update, None));

        assert_eq!(rx1.recv().await.unwrap().table, tables::QUESTIONS);
        assert_eq!(rx2.recv().await.unwrap().table, tables::QUESTIONS);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let feed = ChangeFeed::default();
        feed.publish(TableChange::new(tables::PARTNERS, ChangeOp::Delete, None));
    }
}
