//! Repository for the append-only `engagement_events` table.

use sqlx::PgPool;
use uuid::Uuid;

use perkflow_core::types::DbId;

use crate::models::engagement_event::EventTypeCount;

/// Provides appends and funnel aggregation over engagement events.
pub struct EngagementEventRepo;

impl EngagementEventRepo {
    /// Append one event row, returning the generated id.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        pool: &PgPool,
        event_type: &str,
        session_id: &str,
        partner_id: Option<Uuid>,
        coupon_id: Option<Uuid>,
        question_id: Option<Uuid>,
        metadata: &serde_json::Value,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO engagement_events \
                (event_type, session_id, partner_id, coupon_id, question_id, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id",
        )
        .bind(event_type)
        .bind(session_id)
        .bind(partner_id)
        .bind(coupon_id)
        .bind(question_id)
        .bind(metadata)
        .fetch_one(pool)
        .await
    }

    /// Count events per type, optionally scoped to a partner. The analytics
    /// funnel is computed from these counts.
    pub async fn counts_by_type(
        pool: &PgPool,
        partner_id: Option<Uuid>,
    ) -> Result<Vec<EventTypeCount>, sqlx::Error> {
        sqlx::query_as::<_, EventTypeCount>(
            "SELECT event_type, COUNT(*) AS count \
             FROM engagement_events \
             WHERE ($1::uuid IS NULL OR partner_id = $1) \
             GROUP BY event_type \
             ORDER BY count DESC",
        )
        .bind(partner_id)
        .fetch_all(pool)
        .await
    }

    /// Count distinct sessions seen, optionally scoped to a partner. The
    /// funnel's denominator.
    pub async fn distinct_sessions(
        pool: &PgPool,
        partner_id: Option<Uuid>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(DISTINCT session_id) FROM engagement_events \
             WHERE ($1::uuid IS NULL OR partner_id = $1)",
        )
        .bind(partner_id)
        .fetch_one(pool)
        .await
    }
}
