//! Route definitions for engagement event tracking.
//!
//! Mounted at `/events`.
//!
//! ```text
//! POST /    track
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(events::track))
}
