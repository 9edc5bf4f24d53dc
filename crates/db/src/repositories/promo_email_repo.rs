//! Repository for the `promo_emails` queue.

use sqlx::PgPool;
use uuid::Uuid;

use perkflow_core::types::DbId;

use crate::models::promo_email::PromoEmail;

/// Column list for `promo_emails` queries.
const PROMO_EMAIL_COLUMNS: &str =
    "id, email, coupon_id, claim_id, is_sent, attempts, last_error, created_at, sent_at";

/// Provides queue operations for the promotional email dispatcher.
pub struct PromoEmailRepo;

impl PromoEmailRepo {
    /// Enqueue a promotional email for later dispatch.
    pub async fn enqueue(
        pool: &PgPool,
        email: &str,
        coupon_id: Option<Uuid>,
        claim_id: Option<Uuid>,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO promo_emails (email, coupon_id, claim_id) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(email)
        .bind(coupon_id)
        .bind(claim_id)
        .fetch_one(pool)
        .await
    }

    /// Fetch the next batch of pending records: unsent, fewer than
    /// `max_attempts` tries, oldest first.
    pub async fn fetch_pending(
        pool: &PgPool,
        limit: i64,
        max_attempts: i16,
    ) -> Result<Vec<PromoEmail>, sqlx::Error> {
        let query = format!(
            "SELECT {PROMO_EMAIL_COLUMNS} FROM promo_emails \
             WHERE NOT is_sent AND attempts < $2 \
             ORDER BY created_at LIMIT $1"
        );
        sqlx::query_as::<_, PromoEmail>(&query)
            .bind(limit)
            .bind(max_attempts)
            .fetch_all(pool)
            .await
    }

    /// Mark a record as sent.
    pub async fn mark_sent(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE promo_emails SET is_sent = TRUE, sent_at = now() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Record a failed attempt by incrementing the counter.
    pub async fn record_failure(
        pool: &PgPool,
        id: DbId,
        error: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE promo_emails SET attempts = attempts + 1, last_error = $2 WHERE id = $1",
        )
        .bind(id)
        .bind(error)
        .execute(pool)
        .await?;
        Ok(())
    }
}
