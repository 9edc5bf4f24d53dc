//! Handlers for the `/share` resource.
//!
//! A share link resolves to a preview of the shared coupon; claiming
//! through it issues a brand-new claim with its own redemption code and
//! share token, never the original's.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use perkflow_core::claim::ClaimOutcome;
use perkflow_core::coupon::ShareClaimRequest;
use perkflow_core::engagement;
use perkflow_core::wallet::share_url;
use perkflow_db::models::coupon::CouponView;
use perkflow_db::repositories::{ClaimInput, ClaimRepo};
use perkflow_events::EngagementEvent;

use crate::error::{AppError, AppResult};
use crate::handlers::coupons::ClaimPayload;
use crate::response::{DataResponse, OutcomeResponse};
use crate::state::AppState;

/// Share link preview: the coupon plus who shared it.
#[derive(Debug, Serialize)]
pub struct SharePreview {
    pub coupon: CouponView,
    pub shared_by: Option<String>,
}

/// GET /api/v1/share/{token}
///
/// Resolve a share token to its coupon preview. Unknown and expired tokens
/// are both a plain 404; the distinction is not leaked.
pub async fn resolve(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<impl IntoResponse> {
    let Some((origin_claim, coupon)) = ClaimRepo::find_by_share_token(&state.pool, &token).await?
    else {
        return Err(AppError::not_found("Share link", token));
    };

    Ok(Json(DataResponse {
        data: SharePreview {
            coupon: coupon.into_view(chrono::Utc::now()),
            shared_by: origin_claim.user_name,
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct ShareClaimBody {
    pub session_id: Option<String>,
    #[serde(flatten)]
    pub request: ShareClaimRequest,
}

/// POST /api/v1/share/{token}/claim
///
/// Claim the shared coupon as a referred visitor. A dead link is a
/// `success: false` payload, not an HTTP error, so the page can show the
/// message inline.
pub async fn claim(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(body): Json<ShareClaimBody>,
) -> AppResult<impl IntoResponse> {
    let valid = body.request.validate()?;
    let input = ClaimInput {
        device_id: valid.device_id,
        email: valid.email,
        name: valid.name,
    };

    let outcome = ClaimRepo::claim_with_share(&state.pool, &token, &input).await?;
    Ok(Json(match outcome {
        ClaimOutcome::Accepted(accepted) => {
            if let Some(session_id) = body.session_id.as_deref().filter(|s| !s.trim().is_empty()) {
                state.recorder.track(
                    EngagementEvent::new(engagement::COUPON_CLAIMED, session_id)
                        .with_coupon(accepted.coupon_id)
                        .with_metadata(serde_json::json!({ "referral": true })),
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
