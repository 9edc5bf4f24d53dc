//! Route definitions for the promo email queue.
//!
//! Mounted at `/promo-emails`. Collection is public (it sits at the end of
//! the visitor flow); dispatch is a staff-triggered operation that kicks
//! off one batch in the background and returns immediately.
//!
//! ```text
//! POST /             collect
//! POST /dispatch     dispatch (staff)
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::promo;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(promo::collect))
        .route("/dispatch", post(promo::dispatch))
}
