//! Handlers for the `/promo-emails` resource.
//!
//! Collection queues an address for later promotional mail; dispatch
//! drains one batch of the queue.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use perkflow_core::coupon::is_plausible_email;
use perkflow_core::engagement;
use perkflow_db::repositories::PromoEmailRepo;
use perkflow_events::{EngagementEvent, PromoDispatcher, PromoMailer, SmtpConfig};

use crate::auth::StaffUser;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CollectEmailBody {
    pub email: String,
    pub session_id: Option<String>,
    pub coupon_id: Option<Uuid>,
    pub claim_id: Option<Uuid>,
}

/// POST /api/v1/promo-emails
///
/// Queue an email address for promotional dispatch. Addresses are stored
/// lowercased; the same address may be queued more than once (each row is
/// an independent consent moment).
pub async fn collect(
    State(state): State<AppState>,
    Json(body): Json<CollectEmailBody>,
) -> AppResult<impl IntoResponse> {
    let email = body.email.trim().to_lowercase();
    if !is_plausible_email(&email) {
        return Err(AppError::validation("email does not look valid"));
    }

    let id = PromoEmailRepo::enqueue(&state.pool, &email, body.coupon_id, body.claim_id).await?;

    if let Some(session_id) = body.session_id.as_deref().filter(|s| !s.trim().is_empty()) {
        let mut event = EngagementEvent::new(engagement::EMAIL_COLLECTED, session_id);
        if let Some(coupon_id) = body.coupon_id {
            event = event.with_coupon(coupon_id);
        }
        state.recorder.track(event);
    }

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": id, "queued": true })),
    ))
}

/// POST /api/v1/promo-emails/dispatch
///
/// Kick off one batch of the promo email queue in the background and
/// return 202. With SMTP unconfigured the batch is a logged no-op; queue
/// rows keep their remaining attempts.
pub async fn dispatch(
    State(state): State<AppState>,
    staff: StaffUser,
) -> AppResult<impl IntoResponse> {
    tracing::info!(staff_id = %staff.staff_id, "Promo email dispatch triggered");

    let dispatcher = PromoDispatcher::new(
        state.pool.clone(),
        SmtpConfig::from_env().map(PromoMailer::new),
    );
    tokio::spawn(async move {
        match dispatcher.dispatch_once().await {
            Ok(sent) => tracing::info!(sent, "Promo email batch finished"),
            Err(e) => tracing::error!(error = %e, "Promo email batch failed"),
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "accepted": true })),
    ))
}
