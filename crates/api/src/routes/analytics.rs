//! Route definitions for analytics.
//!
//! Mounted at `/analytics`. All analytics require a staff token.
//!
//! ```text
//! GET /funnel    funnel (staff)
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/funnel", get(analytics::funnel))
}
