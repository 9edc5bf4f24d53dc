//! Repository for the `coupon_claims` table.
//!
//! The claim and redeem operations are the transactional heart of the
//! coupon lifecycle. Atomicity lives here, server-side: a claim takes a row
//! lock on the coupon, and a redemption is a single conditional `UPDATE`,
//! so two devices racing for the same coupon or code always see exactly one
//! authoritative result.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use perkflow_core::claim::{
    generate_redemption_code, generate_share_token, AcceptedClaim, ClaimOutcome, RedeemedClaim,
    RedemptionOutcome,
};

use crate::models::claim::CouponClaim;
use crate::models::coupon::Coupon;
use crate::repositories::coupon_repo::COUPON_COLUMNS;

/// Column list for `coupon_claims` queries.
const CLAIM_COLUMNS: &str = "id, coupon_id, redemption_code, share_token, expires_at, device_id, \
     user_email, user_name, is_redeemed, redeemed_at, redeemed_by, referred_by_token, created_at";

/// Rejection messages shown verbatim to visitors and staff.
mod messages {
    pub const COUPON_UNAVAILABLE: &str = "This coupon is no longer available.";
    pub const SHARE_LINK_DEAD: &str = "This share link is no longer valid.";
    pub const CODE_UNKNOWN: &str = "Unknown redemption code.";
    pub const CODE_ALREADY_REDEEMED: &str = "This coupon has already been redeemed.";
    pub const CLAIM_EXPIRED: &str = "This coupon claim has expired.";
}

/// Fields for a direct or referred claim attempt.
#[derive(Debug, Clone)]
pub struct ClaimInput {
    pub device_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Provides claim issuance, share resolution, and staff redemption.
pub struct ClaimRepo;

impl ClaimRepo {
    /// Fetch a claim by id.
    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<CouponClaim>, sqlx::Error> {
        let query = format!("SELECT {CLAIM_COLUMNS} FROM coupon_claims WHERE id = $1");
        sqlx::query_as::<_, CouponClaim>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Claim a coupon directly.
    ///
    /// Locks the coupon row, re-checks eligibility under the lock, then
    /// inserts the claim with freshly generated codes. A business "no"
    /// (missing, inactive, expired coupon) is an [`ClaimOutcome::Rejected`],
    /// not an error.
    pub async fn claim(
        pool: &PgPool,
        coupon_id: Uuid,
        input: &ClaimInput,
    ) -> Result<ClaimOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(coupon) = Self::lock_coupon(&mut tx, coupon_id).await? else {
            return Ok(ClaimOutcome::rejected(messages::COUPON_UNAVAILABLE));
        };
        if !coupon.is_active || coupon.expires_at <= chrono::Utc::now() {
            return Ok(ClaimOutcome::rejected(messages::COUPON_UNAVAILABLE));
        }

        let accepted = Self::insert_claim(&mut tx, &coupon, input, None).await?;
        tx.commit().await?;
        Ok(ClaimOutcome::Accepted(accepted))
    }

    /// Claim a coupon through a share link (referral).
    ///
    /// Resolves the originating claim by its share token, then issues a new
    /// claim for the same coupon with fresh codes and `referred_by_token`
    /// set. The new redemption code is never the original's: codes are
    /// generated per claim and unique-constrained.
    pub async fn claim_with_share(
        pool: &PgPool,
        share_token: &str,
        input: &ClaimInput,
    ) -> Result<ClaimOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let origin: Option<CouponClaim> = {
            let query = format!(
                "SELECT {CLAIM_COLUMNS} FROM coupon_claims \
                 WHERE share_token = $1 AND expires_at > now()"
            );
            sqlx::query_as::<_, CouponClaim>(&query)
                .bind(share_token)
                .fetch_optional(&mut *tx)
                .await?
        };
        let Some(origin) = origin else {
            return Ok(ClaimOutcome::rejected(messages::SHARE_LINK_DEAD));
        };

        let Some(coupon) = Self::lock_coupon(&mut tx, origin.coupon_id).await? else {
            return Ok(ClaimOutcome::rejected(messages::COUPON_UNAVAILABLE));
        };
        if !coupon.is_active || coupon.expires_at <= chrono::Utc::now() {
            return Ok(ClaimOutcome::rejected(messages::COUPON_UNAVAILABLE));
        }

        let accepted = Self::insert_claim(&mut tx, &coupon, input, Some(share_token)).await?;
        tx.commit().await?;
        Ok(ClaimOutcome::Accepted(accepted))
    }

    /// Resolve a share token to its originating claim and coupon for the
    /// referred visitor's preview. `None` on miss or expiry (terminal "not
    /// found", not retryable).
    pub async fn find_by_share_token(
        pool: &PgPool,
        share_token: &str,
    ) -> Result<Option<(CouponClaim, Coupon)>, sqlx::Error> {
        let claim_query = format!(
            "SELECT {CLAIM_COLUMNS} FROM coupon_claims \
             WHERE share_token = $1 AND expires_at > now()"
        );
        let Some(claim) = sqlx::query_as::<_, CouponClaim>(&claim_query)
            .bind(share_token)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let coupon_query = format!("SELECT {COUPON_COLUMNS} FROM coupons WHERE id = $1");
        let Some(coupon) = sqlx::query_as::<_, Coupon>(&coupon_query)
            .bind(claim.coupon_id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        Ok(Some((claim, coupon)))
    }

    /// Redeem a scanned code on behalf of a staff member.
    ///
    /// `is_redeemed` flips exactly once: the conditional `UPDATE` matches
    /// only un-redeemed, unexpired claims, and a follow-up lookup turns a
    /// zero-row result into the precise rejection message.
    pub async fn redeem(
        pool: &PgPool,
        redemption_code: &str,
        staff_id: &str,
    ) -> Result<RedemptionOutcome, sqlx::Error> {
        let redeemed: Option<(Uuid, Uuid, Option<String>, Option<String>)> = sqlx::query_as(
            "UPDATE coupon_claims \
             SET is_redeemed = TRUE, redeemed_at = now(), redeemed_by = $2 \
             WHERE redemption_code = $1 AND NOT is_redeemed AND expires_at > now() \
             RETURNING id, coupon_id, user_name, user_email",
        )
        .bind(redemption_code)
        .bind(staff_id)
        .fetch_optional(pool)
        .await?;

        let Some((claim_id, coupon_id, user_name, user_email)) = redeemed else {
            // Look the claim up to report why the flip did not happen. A
            // claim that exists but was not matched is either already
            // redeemed or expired.
            let status: Option<bool> = sqlx::query_scalar(
                "SELECT is_redeemed FROM coupon_claims WHERE redemption_code = $1",
            )
            .bind(redemption_code)
            .fetch_optional(pool)
            .await?;

            return Ok(match status {
                None => RedemptionOutcome::rejected(messages::CODE_UNKNOWN),
                Some(true) => RedemptionOutcome::rejected(messages::CODE_ALREADY_REDEEMED),
                Some(false) => RedemptionOutcome::rejected(messages::CLAIM_EXPIRED),
            });
        };

        let coupon_title: String =
            sqlx::query_scalar("SELECT title FROM coupons WHERE id = $1")
                .bind(coupon_id)
                .fetch_one(pool)
                .await?;

        Ok(RedemptionOutcome::Redeemed(RedeemedClaim {
            claim_id,
            coupon_title,
            user_name,
            user_email,
        }))
    }

    async fn lock_coupon(
        tx: &mut Transaction<'_, Postgres>,
        coupon_id: Uuid,
    ) -> Result<Option<Coupon>, sqlx::Error> {
        let query = format!("SELECT {COUPON_COLUMNS} FROM coupons WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Coupon>(&query)
            .bind(coupon_id)
            .fetch_optional(&mut **tx)
            .await
    }

    async fn insert_claim(
        tx: &mut Transaction<'_, Postgres>,
        coupon: &Coupon,
        input: &ClaimInput,
        referred_by_token: Option<&str>,
    ) -> Result<AcceptedClaim, sqlx::Error> {
        let redemption_code = generate_redemption_code();
        let share_token = generate_share_token();

        let claim_id: Uuid = sqlx::query_scalar(
            "INSERT INTO coupon_claims \
                (coupon_id, redemption_code, share_token, expires_at, device_id, \
                 user_email, user_name, referred_by_token) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING id",
        )
        .bind(coupon.id)
        .bind(&redemption_code)
        .bind(&share_token)
        .bind(coupon.expires_at)
        .bind(&input.device_id)
        .bind(&input.email)
        .bind(&input.name)
        .bind(referred_by_token)
        .fetch_one(&mut **tx)
        .await?;

        Ok(AcceptedClaim {
            claim_id,
            coupon_id: coupon.id,
            redemption_code,
            share_token,
            expires_at: coupon.expires_at,
        })
    }
}
