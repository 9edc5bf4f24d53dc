//! Handlers for the `/partners` resource.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use perkflow_db::repositories::PartnerRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/partners
///
/// List active partners by name.
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let partners = PartnerRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: partners }))
}
