//! Handlers for the `/coupons` resource.
//!
//! Claim input is validated in full before any database work; a business
//! "no" (coupon gone, share link dead, code already redeemed) comes back as
//! `success: false` with a message meant for verbatim display, never as an
//! HTTP error.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use perkflow_core::claim::{AcceptedClaim, ClaimOutcome, RedemptionOutcome};
use perkflow_core::coupon::ClaimRequest;
use perkflow_core::engagement;
use perkflow_core::wallet::share_url;
use perkflow_db::repositories::{ClaimInput, ClaimRepo, CouponRepo};
use perkflow_events::EngagementEvent;

use crate::auth::StaffUser;
use crate::error::{AppError, AppResult};
use crate::query::PartnerScopeParams;
use crate::response::{DataResponse, OutcomeResponse};
use crate::state::AppState;

/// GET /api/v1/coupons?partner_id=<uuid>
///
/// List coupons visitors may claim, newest first, with sanitized text and
/// a human-formatted expiry.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PartnerScopeParams>,
) -> AppResult<impl IntoResponse> {
    let now = chrono::Utc::now();
    let coupons = CouponRepo::list_eligible(&state.pool, params.partner_id).await?;
    let views: Vec<_> = coupons.into_iter().map(|c| c.into_view(now)).collect();
    Ok(Json(DataResponse { data: views }))
}

#[derive(Debug, Deserialize)]
pub struct ClaimBody {
    /// Optional session for engagement correlation; claims work without one.
    pub session_id: Option<String>,
    #[serde(flatten)]
    pub request: ClaimRequest,
}

/// Accepted-claim payload: the claim itself plus its ready-to-share link.
#[derive(Debug, Serialize)]
pub struct ClaimPayload {
    #[serde(flatten)]
    pub claim: AcceptedClaim,
    pub share_url: String,
}

/// POST /api/v1/coupons/claim
///
/// Claim a coupon, directly or through a referral token. Validation
/// failures are 400s; an ineligible coupon is a `success: false` payload.
pub async fn claim(
    State(state): State<AppState>,
    Json(body): Json<ClaimBody>,
) -> AppResult<impl IntoResponse> {
    let valid = body.request.validate()?;
    let input = ClaimInput {
        device_id: valid.device_id,
        email: valid.email,
        name: valid.name,
    };

    let outcome = match valid.referral_token.as_deref() {
        Some(token) => ClaimRepo::claim_with_share(&state.pool, token, &input).await?,
        None => ClaimRepo::claim(&state.pool, valid.coupon_id, &input).await?,
    };

    Ok(Json(match outcome {
        ClaimOutcome::Accepted(accepted) => {
            if let Some(session_id) = body.session_id.as_deref().filter(|s| !s.trim().is_empty()) {
                state.recorder.track(
                    EngagementEvent::new(engagement::COUPON_CLAIMED, session_id)
                        .with_coupon(accepted.coupon_id),
                );
            }
            let share_url = share_url(&state.config.public_origin, &accepted.share_token);
            OutcomeResponse::accepted(ClaimPayload {
                claim: accepted,
                share_url,
            })
        }
        ClaimOutcome::Rejected { message } => OutcomeResponse::rejected(message),
    }))
}

#[derive(Debug, Deserialize)]
pub struct RedeemBody {
    pub redemption_code: String,
}

/// POST /api/v1/coupons/redeem
///
/// Redeem a scanned code on behalf of the authenticated staff member. The
/// flip happens exactly once; a second scan reports "already redeemed".
pub async fn redeem(
    State(state): State<AppState>,
    staff: StaffUser,
    Json(body): Json<RedeemBody>,
) -> AppResult<impl IntoResponse> {
    let code = body.redemption_code.trim();
    if code.is_empty() {
        return Err(AppError::validation("redemption code must not be empty"));
    }

    let outcome = ClaimRepo::redeem(&state.pool, code, &staff.staff_id).await?;
    Ok(Json(match outcome {
        RedemptionOutcome::Redeemed(redeemed) => {
            tracing::info!(
                staff_id = %staff.staff_id,
                claim_id = %redeemed.claim_id,
                "Coupon redeemed"
            );
            OutcomeResponse::accepted(redeemed)
        }
        RedemptionOutcome::Rejected { message } => OutcomeResponse::rejected(message),
    }))
}
