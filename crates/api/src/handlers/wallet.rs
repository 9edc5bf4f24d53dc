//! Handler for the `/wallet` resource.
//!
//! Pass issuance is delegated to an external per-platform endpoint; this
//! handler builds the descriptor, proxies it, and records the issued pass.
//! Wallet trouble never invalidates the claim: an unreachable or failing
//! endpoint degrades to a `success: false` payload telling the visitor the
//! coupon still works.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use perkflow_core::coupon::sanitize_text;
use perkflow_core::engagement;
use perkflow_core::wallet::{PassDescriptor, PassPlatform};
use perkflow_db::repositories::{ClaimRepo, CouponRepo, WalletPassRepo};
use perkflow_events::EngagementEvent;

use crate::error::{AppError, AppResult};
use crate::response::OutcomeResponse;
use crate::state::AppState;

/// Shown when the pass cannot be issued for any operational reason.
const WALLET_DEGRADED_MESSAGE: &str =
    "Could not add the pass right now. Your coupon is still valid.";

#[derive(Debug, Deserialize)]
pub struct AddPassBody {
    pub claim_id: Uuid,
    pub platform: String,
    pub session_id: Option<String>,
}

/// What the external wallet endpoint answers with.
#[derive(Debug, Deserialize)]
struct WalletIssueResponse {
    success: bool,
    message: Option<String>,
    #[serde(rename = "passUrl")]
    pass_url: Option<String>,
}

/// Issued-pass payload.
#[derive(Debug, Serialize)]
pub struct PassIssued {
    pub pass_url: Option<String>,
}

/// POST /api/v1/wallet/passes
///
/// Issue a wallet pass for a claim on the requested platform.
pub async fn add_pass(
    State(state): State<AppState>,
    Json(body): Json<AddPassBody>,
) -> AppResult<impl IntoResponse> {
    let platform = PassPlatform::parse(&body.platform)?;

    let claim = ClaimRepo::get(&state.pool, body.claim_id)
        .await?
        .ok_or_else(|| AppError::not_found("Claim", body.claim_id))?;
    let coupon = CouponRepo::get(&state.pool, claim.coupon_id)
        .await?
        .ok_or_else(|| AppError::not_found("Coupon", claim.coupon_id))?;

    let endpoint = match platform {
        PassPlatform::Apple => state.config.wallet.apple_endpoint.as_deref(),
        PassPlatform::Google => state.config.wallet.google_endpoint.as_deref(),
    };
    let Some(endpoint) = endpoint else {
        tracing::warn!(platform = platform.as_str(), "Wallet endpoint not configured");
        return Ok(Json(OutcomeResponse::<PassIssued>::rejected(
            WALLET_DEGRADED_MESSAGE,
        )));
    };

    let descriptor = PassDescriptor {
        platform,
        coupon_id: coupon.id,
        title: sanitize_text(&coupon.title),
        description: sanitize_text(&coupon.description),
        redemption_code: claim.redemption_code.clone(),
        discount: sanitize_text(&coupon.discount),
        expires_at: claim.expires_at,
        image_url: coupon.image_url.clone(),
        partner_id: coupon.partner_id,
    };

    let issued = match state.http.post(endpoint).json(&descriptor).send().await {
        Ok(response) => match response.json::<WalletIssueResponse>().await {
            Ok(issued) => issued,
            Err(e) => {
                tracing::error!(error = %e, "Wallet endpoint returned an unreadable response");
                return Ok(Json(OutcomeResponse::rejected(WALLET_DEGRADED_MESSAGE)));
            }
        },
        Err(e) => {
            tracing::error!(error = %e, "Wallet endpoint unreachable");
            return Ok(Json(OutcomeResponse::rejected(WALLET_DEGRADED_MESSAGE)));
        }
    };

    if !issued.success {
        return Ok(Json(OutcomeResponse::rejected(
            issued
                .message
                .unwrap_or_else(|| WALLET_DEGRADED_MESSAGE.to_string()),
        )));
    }

    WalletPassRepo::insert(
        &state.pool,
        claim.id,
        platform.as_str(),
        issued.pass_url.as_deref(),
    )
    .await?;

    if let Some(session_id) = body.session_id.as_deref().filter(|s| !s.trim().is_empty()) {
        state.recorder.track(
            EngagementEvent::new(engagement::PASS_ADDED, session_id)
                .with_coupon(coupon.id)
                .with_metadata(serde_json::json!({ "platform": platform.as_str() })),
        );
    }

    Ok(Json(OutcomeResponse::accepted(PassIssued {
        pass_url: issued.pass_url,
    })))
}
