//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - Plain create/update DTOs where the handlers need them

pub mod claim;
pub mod coupon;
pub mod engagement_event;
pub mod partner;
pub mod promo_email;
pub mod question;
pub mod response;
pub mod wallet_pass;
