//! Repository for the `coupons` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::coupon::{Coupon, CreateCoupon, UpdateCoupon};

/// Column list for `coupons` queries.
pub(crate) const COUPON_COLUMNS: &str = "id, title, description, code, discount, expires_at, \
     is_active, image_url, pdf_url, partner_id, created_at, updated_at";

/// Provides read/write operations for coupons.
pub struct CouponRepo;

impl CouponRepo {
    /// Fetch a coupon by id.
    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Coupon>, sqlx::Error> {
        let query = format!("SELECT {COUPON_COLUMNS} FROM coupons WHERE id = $1");
        sqlx::query_as::<_, Coupon>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List coupons visitors may claim: active, unexpired, newest first,
    /// optionally scoped to a partner (partner-scoped plus global coupons).
    pub async fn list_eligible(
        pool: &PgPool,
        partner_id: Option<Uuid>,
    ) -> Result<Vec<Coupon>, sqlx::Error> {
        let query = format!(
            "SELECT {COUPON_COLUMNS} FROM coupons \
             WHERE is_active AND expires_at > now() \
               AND ($1::uuid IS NULL OR partner_id IS NULL OR partner_id = $1) \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Coupon>(&query)
            .bind(partner_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a new coupon, returning the created row.
    pub async fn insert(pool: &PgPool, input: &CreateCoupon) -> Result<Coupon, sqlx::Error> {
        let query = format!(
            "INSERT INTO coupons \
                (title, description, code, discount, expires_at, image_url, pdf_url, partner_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COUPON_COLUMNS}"
        );
        sqlx::query_as::<_, Coupon>(&query)
            .bind(&input.title)
            .bind(input.description.as_deref().unwrap_or(""))
            .bind(&input.code)
            .bind(input.discount.as_deref().unwrap_or(""))
            .bind(input.expires_at)
            .bind(&input.image_url)
            .bind(&input.pdf_url)
            .bind(input.partner_id)
            .fetch_one(pool)
            .await
    }

    /// Patch a coupon. Absent fields keep their current values; returns
    /// `None` when the id is unknown.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        input: &UpdateCoupon,
    ) -> Result<Option<Coupon>, sqlx::Error> {
        let query = format!(
            "UPDATE coupons SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                code = COALESCE($4, code), \
                discount = COALESCE($5, discount), \
                expires_at = COALESCE($6, expires_at), \
                is_active = COALESCE($7, is_active), \
                image_url = COALESCE($8, image_url), \
                pdf_url = COALESCE($9, pdf_url), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COUPON_COLUMNS}"
        );
        sqlx::query_as::<_, Coupon>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.code)
            .bind(&input.discount)
            .bind(input.expires_at)
            .bind(input.is_active)
            .bind(&input.image_url)
            .bind(&input.pdf_url)
            .fetch_optional(pool)
            .await
    }
}
