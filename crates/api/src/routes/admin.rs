//! Route definitions for content administration.
//!
//! Mounted at `/admin`. Every handler requires an admin-role staff token
//! and publishes a change notice on the feed after a successful write.
//!
//! ```text
//! POST /questions          create_question
//! PUT  /questions/{id}     update_question
//! POST /coupons            create_coupon
//! PUT  /coupons/{id}       update_coupon
//! POST /partners           create_partner
//! ```

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/questions", post(admin::create_question))
        .route("/questions/{id}", put(admin::update_question))
        .route("/coupons", post(admin::create_coupon))
        .route("/coupons/{id}", put(admin::update_coupon))
        .route("/partners", post(admin::create_partner))
}
