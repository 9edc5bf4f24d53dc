//! Route definitions for share links.
//!
//! Mounted at `/share`. Tokens are unguessable 32-character strings; an
//! unknown or expired token is a plain 404.
//!
//! ```text
//! GET  /{token}          resolve
//! POST /{token}/claim    claim
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::share;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{token}", get(share::resolve))
        .route("/{token}/claim", post(share::claim))
}
