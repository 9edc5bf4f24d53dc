//! HTTP-level integration tests for the survey endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router.
//! Questions are seeded via the repository layer, then exercised through
//! the HTTP API.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, post_json, put_json_auth, staff_token};
use sqlx::PgPool;
use uuid::Uuid;

use perkflow_api::auth::roles;
use perkflow_db::models::question::{CreateQuestion, UpdateQuestion};
use perkflow_db::repositories::{QuestionRepo, ResponseRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_question(prompt: &str, kind: &str, sort_order: i32) -> CreateQuestion {
    CreateQuestion {
        prompt: prompt.to_string(),
        kind: kind.to_string(),
        options: None,
        sort_order: Some(sort_order),
        partner_id: None,
    }
}

fn new_choice_question(prompt: &str, options: &[&str], sort_order: i32) -> CreateQuestion {
    CreateQuestion {
        prompt: prompt.to_string(),
        kind: "multiple_choice".to_string(),
        options: Some(options.iter().map(|o| o.to_string()).collect()),
        sort_order: Some(sort_order),
        partner_id: None,
    }
}

async fn deactivate(pool: &PgPool, id: Uuid) {
    let patch = UpdateQuestion {
        prompt: None,
        kind: None,
        options: None,
        sort_order: None,
        is_active: Some(false),
    };
    QuestionRepo::update(pool, id, &patch).await.unwrap();
}

// ---------------------------------------------------------------------------
// Test: GET /api/v1/questions returns active questions in display order
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_questions_ordered_and_excludes_inactive(pool: PgPool) {
    QuestionRepo::insert(&pool, &new_question("Second", "text", 2))
        .await
        .unwrap();
    QuestionRepo::insert(&pool, &new_question("First", "sentiment", 1))
        .await
        .unwrap();
    let retired = QuestionRepo::insert(&pool, &new_question("Retired", "text", 0))
        .await
        .unwrap();
    deactivate(&pool, retired.id).await;

    let (app, _) = build_test_app(pool);
    let response = get(app, "/api/v1/questions").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    let prompts: Vec<_> = items.iter().map(|q| q["prompt"].as_str().unwrap()).collect();
    assert_eq!(prompts, vec!["First", "Second"]);
}

// ---------------------------------------------------------------------------
// Test: submitting to an inactive question is a 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_submit_to_inactive_question_404(pool: PgPool) {
    let question = QuestionRepo::insert(&pool, &new_question("Gone", "sentiment", 1))
        .await
        .unwrap();
    deactivate(&pool, question.id).await;

    let (app, _) = build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/responses",
        serde_json::json!({
            "question_id": question.id,
            "session_id": "session-inactive",
            "answer": "happy",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: a retried submit is absorbed, the stored answer is kept
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_submit_response_is_idempotent_per_session(pool: PgPool) {
    let question = QuestionRepo::insert(&pool, &new_question("Mood?", "sentiment", 1))
        .await
        .unwrap();

    let (app, _) = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/responses",
        serde_json::json!({
            "question_id": question.id,
            "session_id": "session-retry",
            "answer": "happy",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let first = body_json(response).await;
    assert_eq!(first["data"]["inserted"], true);
    assert_eq!(first["data"]["sentiment"], "happy");

    // Same pair again, now with a different answer.
    let (app, _) = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/responses",
        serde_json::json!({
            "question_id": question.id,
            "session_id": "session-retry",
            "answer": "sad",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let second = body_json(response).await;
    assert_eq!(second["data"]["inserted"], false);
    assert_eq!(second["data"]["id"], first["data"]["id"]);

    // The original answer survives.
    let stored = ResponseRepo::list_for_session(&pool, "session-retry")
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].answer, "happy");
}

// ---------------------------------------------------------------------------
// Test: changing the kind to a choice kind requires options
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_kind_to_choice_without_options_400(pool: PgPool) {
    let question = QuestionRepo::insert(&pool, &new_question("Freeform", "text", 1))
        .await
        .unwrap();

    let (app, _) = build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/v1/admin/questions/{}", question.id),
        &staff_token(roles::ADMIN),
        serde_json::json!({ "kind": "multiple_choice" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Test: an options-only update still sanitizes and enforces the rule
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_options_without_kind_is_still_checked(pool: PgPool) {
    let question = QuestionRepo::insert(
        &pool,
        &new_choice_question("Pick one", &["Coffee", "Tea"], 1),
    )
    .await
    .unwrap();

    // Shrinking the list below two options is rejected.
    let (app, _) = build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/admin/questions/{}", question.id),
        &staff_token(roles::ADMIN),
        serde_json::json!({ "options": ["Coffee"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A valid options-only update goes through with markup stripped.
    let (app, _) = build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/admin/questions/{}", question.id),
        &staff_token(roles::ADMIN),
        serde_json::json!({ "options": ["<b>Coffee</b>", "Tea"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["options"], serde_json::json!(["bCoffee/b", "Tea"]));
}

// ---------------------------------------------------------------------------
// Test: creating a question against an unknown partner is a 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_question_unknown_partner_404(pool: PgPool) {
    let (app, _) = build_test_app(pool);
    let response = common::post_json_auth(
        app,
        "/api/v1/admin/questions",
        &staff_token(roles::ADMIN),
        serde_json::json!({
            "prompt": "Scoped",
            "kind": "text",
            "partner_id": Uuid::new_v4(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}
