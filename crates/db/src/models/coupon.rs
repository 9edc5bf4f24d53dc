//! Coupon entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use perkflow_core::coupon::{format_expiry, sanitize_text};
use perkflow_core::types::Timestamp;

/// A row from the `coupons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Coupon {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub code: String,
    pub discount: String,
    pub expires_at: Timestamp,
    pub is_active: bool,
    pub image_url: Option<String>,
    pub pdf_url: Option<String>,
    pub partner_id: Option<Uuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A coupon as presented to visitors: free text sanitized, expiry
/// human-formatted.
#[derive(Debug, Clone, Serialize)]
pub struct CouponView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub code: String,
    pub discount: String,
    pub expires_at: Timestamp,
    pub expires_in: String,
    pub image_url: Option<String>,
    pub pdf_url: Option<String>,
    pub partner_id: Option<Uuid>,
}

impl Coupon {
    /// Normalize the row for visitor display.
    pub fn into_view(self, now: Timestamp) -> CouponView {
        CouponView {
            expires_in: format_expiry(self.expires_at, now),
            id: self.id,
            title: sanitize_text(&self.title),
            description: sanitize_text(&self.description),
            code: self.code,
            discount: sanitize_text(&self.discount),
            expires_at: self.expires_at,
            image_url: self.image_url,
            pdf_url: self.pdf_url,
            partner_id: self.partner_id,
        }
    }
}

/// DTO for creating a coupon.
#[derive(Debug, Deserialize)]
pub struct CreateCoupon {
    pub title: String,
    pub description: Option<String>,
    pub code: String,
    pub discount: Option<String>,
    pub expires_at: Timestamp,
    pub image_url: Option<String>,
    pub pdf_url: Option<String>,
    pub partner_id: Option<Uuid>,
}

/// DTO for updating a coupon (all fields optional).
#[derive(Debug, Deserialize)]
pub struct UpdateCoupon {
    pub title: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub discount: Option<String>,
    pub expires_at: Option<Timestamp>,
    pub is_active: Option<bool>,
    pub image_url: Option<String>,
    pub pdf_url: Option<String>,
}
