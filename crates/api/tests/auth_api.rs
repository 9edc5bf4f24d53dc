//! Staff authentication and role checks through the full router.
//!
//! Rejections happen in the extractor or the role check, before any
//! database query runs.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use perkflow_api::auth::roles;

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn redeem_request(auth_header: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/v1/coupons/redeem")
        .header("content-type", "application/json");
    if let Some(value) = auth_header {
        builder = builder.header("authorization", value);
    }
    builder
        .body(Body::from(
            serde_json::json!({ "redemption_code": "ABCDEFGHJK" }).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn redeem_without_token_returns_401() {
    let (app, _) = common::build_test_app(common::lazy_pool());

    let response = app.oneshot(redeem_request(None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = json_body(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn redeem_with_wrong_scheme_returns_401() {
    let (app, _) = common::build_test_app(common::lazy_pool());

    let response = app
        .oneshot(redeem_request(Some("Basic dXNlcjpwYXNz")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn redeem_with_garbage_token_returns_401() {
    let (app, _) = common::build_test_app(common::lazy_pool());

    let response = app
        .oneshot(redeem_request(Some("Bearer not.a.jwt")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = json_body(response).await;
    assert_eq!(json["error"], "Invalid or expired token");
}

#[tokio::test]
async fn admin_endpoint_rejects_staff_role_with_403() {
    let (app, _) = common::build_test_app(common::lazy_pool());
    let token = common::staff_token(roles::STAFF);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/admin/partners")
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::from(
                    serde_json::json!({ "name": "Corner Cafe" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = json_body(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn funnel_requires_staff_token() {
    let (app, _) = common::build_test_app(common::lazy_pool());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/analytics/funnel")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
