//! PerkFlow domain logic.
//!
//! Pure, I/O-free building blocks for the captive-portal survey and
//! coupon-reward flow:
//!
//! - [`identity`] — device/session identifiers and the [`identity::SessionContext`]
//!   threaded through every visitor-facing operation.
//! - [`flow`] — the step orchestrator state machine
//!   (welcome → coupon pick → survey → congratulations → thank-you).
//! - [`survey`] — question kinds and per-kind answer validation.
//! - [`coupon`] — coupon presentation helpers and claim input validation.
//! - [`claim`] — the closed claim/redemption outcome types and token
//!   generation.
//! - [`wallet`] — wallet pass descriptors and share-link templating.
//! - [`engagement`] — the closed set of engagement event type names.
//!
//! This crate has no database or network dependencies so it can be used by
//! the API server, background services, and any future CLI tooling alike.

pub mod claim;
pub mod coupon;
pub mod engagement;
pub mod error;
pub mod flow;
pub mod identity;
pub mod survey;
pub mod types;
pub mod wallet;
