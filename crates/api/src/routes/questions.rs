//! Route definitions for survey questions.
//!
//! Mounted at `/questions`.
//!
//! ```text
//! GET /            list
//! GET /random      random
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::questions;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(questions::list))
        .route("/random", get(questions::random))
}
