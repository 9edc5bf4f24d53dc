//! Handlers for the `/responses` resource.
//!
//! A submit is validated against the question's kind and declared options
//! before anything is written, and the insert is idempotent per
//! `(question, session)`: a retried submit after a dropped response is
//! absorbed rather than duplicated or replaced.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use perkflow_core::coupon::sanitize_text;
use perkflow_core::engagement;
use perkflow_core::flow::Sentiment;
use perkflow_core::survey::{completion_sentiment, validate_answer};
use perkflow_db::models::response::CreateResponse;
use perkflow_db::repositories::{QuestionRepo, ResponseRepo};
use perkflow_events::EngagementEvent;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitResponseBody {
    pub question_id: Uuid,
    pub session_id: String,
    pub answer: serde_json::Value,
    pub comment: Option<String>,
    pub location_id: Option<Uuid>,
    pub partner_id: Option<Uuid>,
}

/// Submit acknowledgement. `sentiment` is the polarity signal for the
/// client flow: only sentiment questions carry one, everything else is
/// neutral.
#[derive(Debug, Serialize)]
pub struct SubmittedResponse {
    pub id: Uuid,
    pub inserted: bool,
    pub sentiment: Sentiment,
}

/// POST /api/v1/responses
///
/// Validate and record one answer. Returns 201 on a fresh insert, 200 when
/// an identical `(question, session)` pair already answered.
pub async fn submit(
    State(state): State<AppState>,
    Json(body): Json<SubmitResponseBody>,
) -> AppResult<impl IntoResponse> {
    let session_id = body.session_id.trim().to_string();
    if session_id.is_empty() {
        return Err(AppError::validation("session id must not be empty"));
    }

    let question = QuestionRepo::get(&state.pool, body.question_id)
        .await?
        .filter(|q| q.is_active)
        .ok_or_else(|| AppError::not_found("Question", body.question_id))?;

    let kind = question.parsed_kind()?;
    let options = question.option_list();
    let stored = validate_answer(kind, options.as_deref(), &body.answer)?;

    let comment = body
        .comment
        .as_deref()
        .map(sanitize_text)
        .filter(|c| !c.is_empty());

    let input = CreateResponse {
        question_id: question.id,
        answer: stored.clone(),
        comment,
        session_id: session_id.clone(),
        location_id: body.location_id,
        partner_id: body.partner_id,
    };
    let (id, inserted) = ResponseRepo::insert(&state.pool, &input).await?;

    if inserted {
        let mut event = EngagementEvent::new(engagement::SURVEY_RESPONSE_SUBMITTED, &session_id)
            .with_question(question.id);
        if let Some(partner_id) = body.partner_id {
            event = event.with_partner(partner_id);
        }
        state.recorder.track(event);
    }

    let status = if inserted {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(DataResponse {
            data: SubmittedResponse {
                id,
                inserted,
                sentiment: completion_sentiment(kind, &stored),
            },
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct AddCommentBody {
    pub comment: String,
}

/// POST /api/v1/responses/{id}/comment
///
/// Attach a follow-up comment to an already-recorded response.
pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AddCommentBody>,
) -> AppResult<impl IntoResponse> {
    let comment = sanitize_text(&body.comment);
    if comment.is_empty() {
        return Err(AppError::validation("comment must not be empty"));
    }

    let updated = ResponseRepo::add_comment(&state.pool, id, &comment).await?;
    if !updated {
        return Err(AppError::not_found("Response", id));
    }
    Ok(StatusCode::NO_CONTENT)
}
