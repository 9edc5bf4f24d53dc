//! Engagement event entity model.

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use perkflow_core::types::{DbId, Timestamp};

/// A row from the append-only `engagement_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EngagementEventRow {
    pub id: DbId,
    pub event_type: String,
    pub session_id: String,
    pub partner_id: Option<Uuid>,
    pub coupon_id: Option<Uuid>,
    pub question_id: Option<Uuid>,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
}

/// A per-event-type count used by the analytics funnel.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventTypeCount {
    pub event_type: String,
    pub count: i64,
}
