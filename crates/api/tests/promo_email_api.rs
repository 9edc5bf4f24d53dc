//! HTTP-level integration tests for promotional email collection.
//!
//! The collection endpoint is the queue's producer; these tests verify
//! that a collected address lands in the pending queue exactly as the
//! dispatcher will read it.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{body_json, build_test_app, post_json};
use sqlx::PgPool;

use perkflow_db::repositories::PromoEmailRepo;

// ---------------------------------------------------------------------------
// Test: a collected address becomes a pending queue row
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_collected_email_is_queued_pending(pool: PgPool) {
    let (app, sink) = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/promo-emails",
        serde_json::json!({
            "email": "  Visitor@Example.COM ",
            "session_id": "session-promo",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["queued"], true);
    assert!(json["id"].is_number());

    let pending = PromoEmailRepo::fetch_pending(&pool, 10, 3).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].email, "visitor@example.com");
    assert!(!pending[0].is_sent);
    assert_eq!(pending[0].attempts, 0);

    // The collection is recorded as an engagement event.
    let mut recorded = sink.recorded();
    for _ in 0..50 {
        if !recorded.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        recorded = sink.recorded();
    }
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].event_type, "email_collected");
    assert_eq!(recorded[0].session_id, "session-promo");
}

// ---------------------------------------------------------------------------
// Test: exhausted rows drop out of the pending batch
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_failed_rows_leave_pending_after_max_attempts(pool: PgPool) {
    let id = PromoEmailRepo::enqueue(&pool, "bounce@example.com", None, None)
        .await
        .unwrap();

    for _ in 0..3 {
        PromoEmailRepo::record_failure(&pool, id, "connection refused")
            .await
            .unwrap();
    }

    let pending = PromoEmailRepo::fetch_pending(&pool, 10, 3).await.unwrap();
    assert!(pending.is_empty());
}

// ---------------------------------------------------------------------------
// Test: sent rows drop out of the pending batch
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_sent_rows_leave_pending(pool: PgPool) {
    let id = PromoEmailRepo::enqueue(&pool, "done@example.com", None, None)
        .await
        .unwrap();
    PromoEmailRepo::mark_sent(&pool, id).await.unwrap();

    let pending = PromoEmailRepo::fetch_pending(&pool, 10, 3).await.unwrap();
    assert!(pending.is_empty());
}
