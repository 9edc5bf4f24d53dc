//! Survey response entity model.

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use perkflow_core::types::Timestamp;

/// A row from the `survey_responses` table. Immutable once written except
/// for the optional follow-up `comment`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SurveyResponse {
    pub id: Uuid,
    pub question_id: Uuid,
    pub answer: String,
    pub comment: Option<String>,
    pub session_id: String,
    pub location_id: Option<Uuid>,
    pub partner_id: Option<Uuid>,
    pub created_at: Timestamp,
}

/// DTO for inserting a response; `answer` is the canonical stored string
/// produced by answer validation.
#[derive(Debug, Clone)]
pub struct CreateResponse {
    pub question_id: Uuid,
    pub answer: String,
    pub comment: Option<String>,
    pub session_id: String,
    pub location_id: Option<Uuid>,
    pub partner_id: Option<Uuid>,
}
