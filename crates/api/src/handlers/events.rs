//! Handler for the `/events` engagement tracking endpoint.
//!
//! Tracking is fire-and-forget: the event goes onto the recorder's channel
//! and the request is acknowledged with 202 immediately. A full channel
//! drops the event rather than slowing the flow down.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use perkflow_core::engagement;
use perkflow_events::EngagementEvent;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TrackEventBody {
    pub event_type: String,
    pub session_id: String,
    pub partner_id: Option<Uuid>,
    pub coupon_id: Option<Uuid>,
    pub question_id: Option<Uuid>,
    pub metadata: Option<serde_json::Value>,
}

/// POST /api/v1/events
///
/// Record one engagement event. Unknown event types are accepted (the
/// vocabulary grows faster than deployments) but logged at debug so stray
/// client typos are discoverable.
pub async fn track(
    State(state): State<AppState>,
    Json(body): Json<TrackEventBody>,
) -> AppResult<impl IntoResponse> {
    let event_type = body.event_type.trim();
    let session_id = body.session_id.trim();
    if event_type.is_empty() || session_id.is_empty() {
        return Err(AppError::validation(
            "event_type and session_id must not be empty",
        ));
    }
    if !engagement::is_known_event_type(event_type) {
        tracing::debug!(event_type, "Tracking unknown engagement event type");
    }

    let mut event = EngagementEvent::new(event_type, session_id);
    if let Some(partner_id) = body.partner_id {
        event = event.with_partner(partner_id);
    }
    if let Some(coupon_id) = body.coupon_id {
        event = event.with_coupon(coupon_id);
    }
    if let Some(question_id) = body.question_id {
        event = event.with_question(question_id);
    }
    if let Some(metadata) = body.metadata {
        event = event.with_metadata(metadata);
    }
    state.recorder.track(event);

    Ok((StatusCode::ACCEPTED, Json(serde_json::json!({ "accepted": true }))))
}
