//! Coupon claim entity model.

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use perkflow_core::types::Timestamp;

/// A row from the `coupon_claims` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CouponClaim {
    pub id: Uuid,
    pub coupon_id: Uuid,
    pub redemption_code: String,
    pub share_token: String,
    pub expires_at: Timestamp,
    pub device_id: Option<String>,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    pub is_redeemed: bool,
    pub redeemed_at: Option<Timestamp>,
    pub redeemed_by: Option<String>,
    pub referred_by_token: Option<String>,
    pub created_at: Timestamp,
}
