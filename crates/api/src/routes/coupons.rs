//! Route definitions for coupons.
//!
//! Mounted at `/coupons`. Redemption requires a staff token.
//!
//! ```text
//! GET  /          list
//! POST /claim     claim
//! POST /redeem    redeem (staff)
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::coupons;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(coupons::list))
        .route("/claim", post(coupons::claim))
        .route("/redeem", post(coupons::redeem))
}
