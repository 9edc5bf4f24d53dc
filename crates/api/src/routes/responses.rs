//! Route definitions for survey responses.
//!
//! Mounted at `/responses`.
//!
//! ```text
//! POST /                 submit
//! POST /{id}/comment     add_comment
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::responses;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(responses::submit))
        .route("/{id}/comment", post(responses::add_comment))
}
