//! Fire-and-forget engagement event recording.
//!
//! [`EngagementRecorder`] is the write side of the analytics contract:
//! callers enqueue an [`EngagementEvent`] onto a bounded channel and move
//! on. A background task drains the channel into an [`EventSink`]
//! (Postgres in production, [`MemorySink`] in tests). Recording must never
//! block or fail the user-facing flow: a full channel drops the event with
//! a warning, and sink failures are logged and swallowed.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use perkflow_core::types::Timestamp;
use perkflow_db::repositories::EngagementEventRepo;
use perkflow_db::DbPool;

// ---------------------------------------------------------------------------
// EngagementEvent
// ---------------------------------------------------------------------------

/// One visitor action, tied to the session/device/partner/coupon ids that
/// correlate it.
///
/// Constructed via [`EngagementEvent::new`] and enriched with the builder
/// methods [`with_partner`](EngagementEvent::with_partner),
/// [`with_coupon`](EngagementEvent::with_coupon),
/// [`with_question`](EngagementEvent::with_question), and
/// [`with_metadata`](EngagementEvent::with_metadata).
#[derive(Debug, Clone, Serialize)]
pub struct EngagementEvent {
    /// Event type name from [`perkflow_core::engagement`].
    pub event_type: String,

    /// The session the action belongs to.
    pub session_id: String,

    /// Optional partner scope.
    pub partner_id: Option<Uuid>,

    /// Optional coupon the action concerns.
    pub coupon_id: Option<Uuid>,

    /// Optional question the action concerns.
    pub question_id: Option<Uuid>,

    /// Free-form key/value payload.
    pub metadata: serde_json::Value,

    /// When the event was recorded (UTC).
    pub recorded_at: Timestamp,
}

impl EngagementEvent {
    /// Create a new event with only the required fields.
    pub fn new(event_type: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            session_id: session_id.into(),
            partner_id: None,
            coupon_id: None,
            question_id: None,
            metadata: serde_json::Value::Object(Default::default()),
            recorded_at: chrono::Utc::now(),
        }
    }

    pub fn with_partner(mut self, partner_id: Uuid) -> Self {
        self.partner_id = Some(partner_id);
        self
    }

    pub fn with_coupon(mut self, coupon_id: Uuid) -> Self {
        self.coupon_id = Some(coupon_id);
        self
    }

    pub fn with_question(mut self, question_id: Uuid) -> Self {
        self.question_id = Some(question_id);
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

// ---------------------------------------------------------------------------
// EventSink
// ---------------------------------------------------------------------------

/// Where drained events land. The seam exists so tests can observe exactly
/// which events were (or were not) recorded without a database.
#[async_trait]
pub trait EventSink: Send + Sync + 'static {
    async fn append(&self, event: &EngagementEvent) -> anyhow::Result<()>;
}

/// Production sink: appends to the `engagement_events` table.
pub struct PgSink {
    pool: DbPool,
}

impl PgSink {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventSink for PgSink {
    async fn append(&self, event: &EngagementEvent) -> anyhow::Result<()> {
        EngagementEventRepo::insert(
            &self.pool,
            &event.event_type,
            &event.session_id,
            event.partner_id,
            event.coupon_id,
            event.question_id,
            &event.metadata,
        )
        .await?;
        Ok(())
    }
}

/// In-memory sink for tests.
#[derive(Default)]
pub struct MemorySink {
    events: std::sync::Mutex<Vec<EngagementEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far.
    pub fn recorded(&self) -> Vec<EngagementEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventSink for MemorySink {
    async fn append(&self, event: &EngagementEvent) -> anyhow::Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// EngagementRecorder
// ---------------------------------------------------------------------------

/// Default channel capacity. Overflow means analytics under heavy load
/// loses events, which is acceptable; blocking the flow is not.
const DEFAULT_CAPACITY: usize = 1024;

/// Cloneable handle for enqueueing engagement events.
#[derive(Clone)]
pub struct EngagementRecorder {
    tx: mpsc::Sender<EngagementEvent>,
}

impl EngagementRecorder {
    /// Spawn the background writer and return the recorder handle plus the
    /// writer's join handle (held by the caller for shutdown).
    pub fn spawn(sink: Arc<dyn EventSink>) -> (Self, tokio::task::JoinHandle<()>) {
        Self::spawn_with_capacity(sink, DEFAULT_CAPACITY)
    }

    pub fn spawn_with_capacity(
        sink: Arc<dyn EventSink>,
        capacity: usize,
    ) -> (Self, tokio::task::JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<EngagementEvent>(capacity);
        let handle = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if let Err(e) = sink.append(&event).await {
                    tracing::error!(
                        error = %e,
                        event_type = %event.event_type,
                        "Failed to persist engagement event"
                    );
                }
            }
            tracing::info!("Engagement recorder channel closed, writer shutting down");
        });
        (Self { tx }, handle)
    }

    /// Enqueue an event. Never blocks and never errors: when the channel is
    /// full or closed the event is dropped with a warning.
    pub fn track(&self, event: EngagementEvent) {
        if let Err(e) = self.tx.try_send(event) {
            let event = match &e {
                mpsc::error::TrySendError::Full(ev) => ev,
                mpsc::error::TrySendError::Closed(ev) => ev,
            };
            tracing::warn!(
                event_type = %event.event_type,
                "Dropping engagement event: {}",
                if matches!(e, mpsc::error::TrySendError::Full(_)) {
                    "channel full"
                } else {
                    "recorder shut down"
                }
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use perkflow_core::engagement;

    use super::*;

    async fn drain(recorder: EngagementRecorder, handle: tokio::task::JoinHandle<()>) {
        drop(recorder);
        handle.await.expect("writer task should finish cleanly");
    }

    #[tokio::test]
    async fn tracked_events_reach_the_sink() {
        let sink = Arc::new(MemorySink::new());
        let (recorder, handle) = EngagementRecorder::spawn(Arc::clone(&sink) as Arc<dyn EventSink>);

        let coupon_id = Uuid::new_v4();
        recorder.track(
            EngagementEvent::new(engagement::COUPON_CLAIMED, "session-1")
                .with_coupon(coupon_id)
                .with_metadata(serde_json::json!({"source": "picker"})),
        );
        drain(recorder, handle).await;

        let recorded = sink.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].event_type, engagement::COUPON_CLAIMED);
        assert_eq!(recorded[0].coupon_id, Some(coupon_id));
        assert_eq!(recorded[0].metadata["source"], "picker");
    }

    #[tokio::test]
    async fn overflow_drops_events_instead_of_blocking() {
        // A sink that never completes, so nothing is drained.
        struct StuckSink;

        #[async_trait]
        impl EventSink for StuckSink {
            async fn append(&self, _event: &EngagementEvent) -> anyhow::Result<()> {
                futures_never().await;
                Ok(())
            }
        }

        async fn futures_never() {
            std::future::pending::<()>().await
        }

        let (recorder, handle) =
            EngagementRecorder::spawn_with_capacity(Arc::new(StuckSink), 2);

        // The writer takes one event off the channel and sticks; capacity 2
        // absorbs two more. Everything beyond that must drop silently.
        for i in 0..10 {
            recorder.track(EngagementEvent::new("visit_partner_page", format!("s-{i}")));
        }

        // Still alive, nothing blocked.
        recorder.track(EngagementEvent::new("visit_partner_page", "s-final"));
        handle.abort();
    }

    #[tokio::test]
    async fn sink_failures_are_swallowed() {
        struct FailingSink;

        #[async_trait]
        impl EventSink for FailingSink {
            async fn append(&self, _event: &EngagementEvent) -> anyhow::Result<()> {
                anyhow::bail!("sink unavailable")
            }
        }

        let (recorder, handle) = EngagementRecorder::spawn(Arc::new(FailingSink));
        recorder.track(EngagementEvent::new("copy_code", "session-1"));
        drain(recorder, handle).await;
        // Reaching here means the failure did not propagate anywhere.
    }
}
