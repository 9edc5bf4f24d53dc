//! Handlers for the `/questions` resource.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use perkflow_db::repositories::QuestionRepo;

use crate::error::AppResult;
use crate::query::PartnerScopeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/questions?partner_id=<uuid>
///
/// List active questions in presentation order. With a partner scope the
/// list contains partner-scoped plus global questions.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PartnerScopeParams>,
) -> AppResult<impl IntoResponse> {
    let questions = QuestionRepo::list_active(&state.pool, params.partner_id).await?;
    Ok(Json(DataResponse { data: questions }))
}

/// GET /api/v1/questions/random?partner_id=<uuid>
///
/// Pick one active question uniformly at random. `data` is `null` when no
/// questions are configured; that is an empty state, not an error.
pub async fn random(
    State(state): State<AppState>,
    Query(params): Query<PartnerScopeParams>,
) -> AppResult<impl IntoResponse> {
    let question = QuestionRepo::random_active(&state.pool, params.partner_id).await?;
    Ok(Json(DataResponse { data: question }))
}
