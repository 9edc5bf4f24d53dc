//! Promotional email queue entity model.

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use perkflow_core::types::{DbId, Timestamp};

/// A row from the `promo_emails` queue.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PromoEmail {
    pub id: DbId,
    pub email: String,
    pub coupon_id: Option<Uuid>,
    pub claim_id: Option<Uuid>,
    pub is_sent: bool,
    pub attempts: i16,
    pub last_error: Option<String>,
    pub created_at: Timestamp,
    pub sent_at: Option<Timestamp>,
}
