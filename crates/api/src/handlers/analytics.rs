//! Handlers for the `/analytics` resource.
//!
//! The funnel is computed from the append-only engagement event log:
//! distinct sessions as the denominator, per-type counts as the stages.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use perkflow_core::engagement;
use perkflow_db::models::engagement_event::EventTypeCount;
use perkflow_db::repositories::EngagementEventRepo;

use crate::auth::StaffUser;
use crate::error::AppResult;
use crate::query::PartnerScopeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Headline funnel stages, each a raw event count.
#[derive(Debug, Serialize)]
pub struct FunnelStages {
    pub selected_coupon: i64,
    pub claimed_coupon: i64,
    pub completed_survey: i64,
    pub added_to_wallet: i64,
    pub submitted_email: i64,
}

/// The full funnel report.
#[derive(Debug, Serialize)]
pub struct FunnelReport {
    /// Distinct sessions seen; the funnel's denominator.
    pub sessions: i64,
    pub stages: FunnelStages,
    /// Claimed coupons per session, 0.0 when no sessions yet.
    pub claim_rate: f64,
    /// Completed surveys per session, 0.0 when no sessions yet.
    pub completion_rate: f64,
    /// Raw per-type counts, most frequent first.
    pub events: Vec<EventTypeCount>,
}

/// GET /api/v1/analytics/funnel?partner_id=<uuid>
///
/// Engagement funnel report, optionally scoped to a partner.
pub async fn funnel(
    State(state): State<AppState>,
    _staff: StaffUser,
    Query(params): Query<PartnerScopeParams>,
) -> AppResult<impl IntoResponse> {
    let events = EngagementEventRepo::counts_by_type(&state.pool, params.partner_id).await?;
    let sessions = EngagementEventRepo::distinct_sessions(&state.pool, params.partner_id).await?;

    let count_of = |event_type: &str| {
        events
            .iter()
            .find(|c| c.event_type == event_type)
            .map_or(0, |c| c.count)
    };

    let stages = FunnelStages {
        selected_coupon: count_of(engagement::COUPON_SELECTED),
        claimed_coupon: count_of(engagement::COUPON_CLAIMED),
        completed_survey: count_of(engagement::SURVEY_COMPLETED),
        added_to_wallet: count_of(engagement::PASS_ADDED),
        // Counted from the server-side collection event, not the client's
        // opt-in tap, so the stage reflects addresses actually stored.
        submitted_email: count_of(engagement::EMAIL_COLLECTED),
    };

    let rate = |count: i64| {
        if sessions > 0 {
            count as f64 / sessions as f64
        } else {
            0.0
        }
    };

    Ok(Json(DataResponse {
        data: FunnelReport {
            sessions,
            claim_rate: rate(stages.claimed_coupon),
            completion_rate: rate(stages.completed_survey),
            stages,
            events,
        },
    }))
}
