//! Route definitions for wallet passes.
//!
//! Mounted at `/wallet`.
//!
//! ```text
//! POST /passes    add_pass
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::wallet;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/passes", post(wallet::add_pass))
}
