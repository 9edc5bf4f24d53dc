//! Input validation through the full router.
//!
//! Every request here is rejected before any database query runs, so the
//! lazy, unreachable pool from `common::lazy_pool` is never touched.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let (app, _) = common::build_test_app(common::lazy_pool());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn claim_with_malformed_coupon_id_is_rejected() {
    let (app, _) = common::build_test_app(common::lazy_pool());

    let response = app
        .oneshot(post_json(
            "/api/v1/coupons/claim",
            serde_json::json!({ "coupon_id": "not-a-uuid" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn claim_with_implausible_email_is_rejected() {
    let (app, _) = common::build_test_app(common::lazy_pool());

    let response = app
        .oneshot(post_json(
            "/api/v1/coupons/claim",
            serde_json::json!({
                "coupon_id": "11111111-2222-3333-4444-555555555555",
                "email": "not-an-email",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn share_claim_with_short_device_id_is_rejected() {
    let (app, _) = common::build_test_app(common::lazy_pool());

    let response = app
        .oneshot(post_json(
            "/api/v1/share/sometoken/claim",
            serde_json::json!({ "device_id": "short" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn response_submit_with_empty_session_is_rejected() {
    let (app, _) = common::build_test_app(common::lazy_pool());

    let response = app
        .oneshot(post_json(
            "/api/v1/responses",
            serde_json::json!({
                "question_id": "11111111-2222-3333-4444-555555555555",
                "session_id": "   ",
                "answer": "happy",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn event_with_empty_type_is_rejected() {
    let (app, _) = common::build_test_app(common::lazy_pool());

    let response = app
        .oneshot(post_json(
            "/api/v1/events",
            serde_json::json!({ "event_type": "", "session_id": "session-1" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn promo_email_with_implausible_address_is_rejected() {
    let (app, _) = common::build_test_app(common::lazy_pool());

    let response = app
        .oneshot(post_json(
            "/api/v1/promo-emails",
            serde_json::json!({ "email": "definitely-not-an-address" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn wallet_pass_with_unknown_platform_is_rejected() {
    let (app, _) = common::build_test_app(common::lazy_pool());

    let response = app
        .oneshot(post_json(
            "/api/v1/wallet/passes",
            serde_json::json!({
                "claim_id": "11111111-2222-3333-4444-555555555555",
                "platform": "samsung",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}
