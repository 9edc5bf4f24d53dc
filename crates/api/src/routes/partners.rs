//! Route definitions for partners.
//!
//! Mounted at `/partners`.
//!
//! ```text
//! GET /    list
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::partners;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(partners::list))
}
