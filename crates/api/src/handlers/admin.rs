//! Handlers for content administration.
//!
//! All writes require an admin-role staff token, sanitize free text on the
//! way in, and publish a change notice so connected clients refetch.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use perkflow_core::coupon::sanitize_text;
use perkflow_core::survey::QuestionKind;
use perkflow_db::models::coupon::{CreateCoupon, UpdateCoupon};
use perkflow_db::models::question::{CreateQuestion, UpdateQuestion};
use perkflow_db::repositories::{CouponRepo, PartnerRepo, QuestionRepo};
use perkflow_events::feed::tables;
use perkflow_events::{ChangeOp, TableChange};

use crate::auth::StaffUser;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/questions
///
/// Create a question. Choice kinds must declare at least two options.
pub async fn create_question(
    State(state): State<AppState>,
    staff: StaffUser,
    Json(mut input): Json<CreateQuestion>,
) -> AppResult<impl IntoResponse> {
    staff.require_admin()?;

    input.prompt = sanitize_text(&input.prompt);
    if input.prompt.is_empty() {
        return Err(AppError::validation("prompt must not be empty"));
    }
    let kind = QuestionKind::parse(&input.kind)?;
    input.options = sanitize_options(input.options);
    require_enough_options(kind, input.options.as_deref())?;
    require_known_partner(&state, input.partner_id).await?;

    let question = QuestionRepo::insert(&state.pool, &input).await?;
    state.feed.publish(TableChange::new(
        tables::QUESTIONS,
        ChangeOp::Insert,
        Some(question.id),
    ));
    Ok((StatusCode::CREATED, Json(DataResponse { data: question })))
}

/// PUT /api/v1/admin/questions/{id}
///
/// Patch a question; absent fields keep their current values. The
/// per-kind option rule is checked against the effective kind and the
/// effective options, so neither a kind change without options nor an
/// options change without a kind can dodge it.
pub async fn update_question(
    State(state): State<AppState>,
    staff: StaffUser,
    Path(id): Path<Uuid>,
    Json(mut input): Json<UpdateQuestion>,
) -> AppResult<impl IntoResponse> {
    staff.require_admin()?;

    let existing = QuestionRepo::get(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Question", id))?;

    if let Some(prompt) = &input.prompt {
        let prompt = sanitize_text(prompt);
        if prompt.is_empty() {
            return Err(AppError::validation("prompt must not be empty"));
        }
        input.prompt = Some(prompt);
    }

    let effective_kind = match &input.kind {
        Some(kind) => QuestionKind::parse(kind)?,
        None => existing.parsed_kind()?,
    };
    input.options = sanitize_options(input.options);
    let effective_options = input.options.clone().or_else(|| existing.option_list());
    require_enough_options(effective_kind, effective_options.as_deref())?;

    let question = QuestionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Question", id))?;
    state.feed.publish(TableChange::new(
        tables::QUESTIONS,
        ChangeOp::Update,
        Some(question.id),
    ));
    Ok(Json(DataResponse { data: question }))
}

/// Sanitize declared options, dropping any that end up empty.
fn sanitize_options(options: Option<Vec<String>>) -> Option<Vec<String>> {
    options.map(|opts| {
        opts.iter()
            .map(|o| sanitize_text(o))
            .filter(|o| !o.is_empty())
            .collect()
    })
}

/// Enforce the per-kind option rule: choice kinds need at least two.
fn require_enough_options(
    kind: QuestionKind,
    options: Option<&[String]>,
) -> Result<(), AppError> {
    if kind.requires_options() && options.map_or(0, <[String]>::len) < 2 {
        return Err(AppError::validation(format!(
            "{} questions must declare at least two options",
            kind.as_str()
        )));
    }
    Ok(())
}

/// Reject writes that reference a partner this system has never seen.
async fn require_known_partner(
    state: &AppState,
    partner_id: Option<Uuid>,
) -> Result<(), AppError> {
    if let Some(partner_id) = partner_id {
        PartnerRepo::get(&state.pool, partner_id)
            .await?
            .ok_or_else(|| AppError::not_found("Partner", partner_id))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Coupons
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/coupons
///
/// Create a coupon. The expiry must be in the future.
pub async fn create_coupon(
    State(state): State<AppState>,
    staff: StaffUser,
    Json(mut input): Json<CreateCoupon>,
) -> AppResult<impl IntoResponse> {
    staff.require_admin()?;

    input.title = sanitize_text(&input.title);
    input.code = input.code.trim().to_string();
    if input.title.is_empty() || input.code.is_empty() {
        return Err(AppError::validation("title and code must not be empty"));
    }
    if input.expires_at <= chrono::Utc::now() {
        return Err(AppError::validation("expires_at must be in the future"));
    }
    input.description = input.description.as_deref().map(sanitize_text);
    input.discount = input.discount.as_deref().map(sanitize_text);
    require_known_partner(&state, input.partner_id).await?;

    let coupon = CouponRepo::insert(&state.pool, &input).await?;
    state.feed.publish(TableChange::new(
        tables::COUPONS,
        ChangeOp::Insert,
        Some(coupon.id),
    ));
    Ok((StatusCode::CREATED, Json(DataResponse { data: coupon })))
}

/// PUT /api/v1/admin/coupons/{id}
///
/// Patch a coupon; absent fields keep their current values. Deactivation
/// (`is_active: false`) is how a coupon is pulled from circulation.
pub async fn update_coupon(
    State(state): State<AppState>,
    staff: StaffUser,
    Path(id): Path<Uuid>,
    Json(mut input): Json<UpdateCoupon>,
) -> AppResult<impl IntoResponse> {
    staff.require_admin()?;

    if let Some(title) = &input.title {
        let title = sanitize_text(title);
        if title.is_empty() {
            return Err(AppError::validation("title must not be empty"));
        }
        input.title = Some(title);
    }
    input.description = input.description.as_deref().map(sanitize_text);
    input.discount = input.discount.as_deref().map(sanitize_text);

    let coupon = CouponRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Coupon", id))?;
    state.feed.publish(TableChange::new(
        tables::COUPONS,
        ChangeOp::Update,
        Some(coupon.id),
    ));
    Ok(Json(DataResponse { data: coupon }))
}

// ---------------------------------------------------------------------------
// Partners
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreatePartnerBody {
    pub name: String,
}

/// POST /api/v1/admin/partners
///
/// Create a partner.
pub async fn create_partner(
    State(state): State<AppState>,
    staff: StaffUser,
    Json(body): Json<CreatePartnerBody>,
) -> AppResult<impl IntoResponse> {
    staff.require_admin()?;

    let name = sanitize_text(&body.name);
    if name.is_empty() {
        return Err(AppError::validation("name must not be empty"));
    }

    let partner = PartnerRepo::insert(&state.pool, &name).await?;
    state.feed.publish(TableChange::new(
        tables::PARTNERS,
        ChangeOp::Insert,
        Some(partner.id),
    ));
    Ok((StatusCode::CREATED, Json(DataResponse { data: partner })))
}
