pub mod admin;
pub mod analytics;
pub mod coupons;
pub mod events;
pub mod health;
pub mod partners;
pub mod promo;
pub mod questions;
pub mod responses;
pub mod share;
pub mod wallet;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                            WebSocket change feed
///
/// /questions                     list active questions
/// /questions/random              one random active question
///
/// /responses                     submit an answer (POST)
/// /responses/{id}/comment        attach a follow-up comment (POST)
///
/// /coupons                       list claimable coupons
/// /coupons/claim                 claim a coupon (POST)
/// /coupons/redeem                redeem a scanned code (POST, staff)
///
/// /share/{token}                 resolve a share link
/// /share/{token}/claim           claim through a share link (POST)
///
/// /events                        record an engagement event (POST)
///
/// /wallet/passes                 issue a wallet pass (POST)
///
/// /promo-emails                  queue an email for promo mail (POST)
/// /promo-emails/dispatch         drain one promo email batch (POST, staff)
///
/// /analytics/funnel              engagement funnel report (staff)
///
/// /partners                      list active partners
///
/// /admin/questions               create (POST, admin)
/// /admin/questions/{id}          update (PUT, admin)
/// /admin/coupons                 create (POST, admin)
/// /admin/coupons/{id}            update (PUT, admin)
/// /admin/partners                create (POST, admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/questions", questions::router())
        .nest("/responses", responses::router())
        .nest("/coupons", coupons::router())
        .nest("/share", share::router())
        .nest("/events", events::router())
        .nest("/wallet", wallet::router())
        .nest("/promo-emails", promo::router())
        .nest("/analytics", analytics::router())
        .nest("/partners", partners::router())
        .nest("/admin", admin::router())
        .route("/ws", get(ws::ws_handler))
}
