pub mod admin;
pub mod analytics;
pub mod coupons;
pub mod events;
pub mod partners;
pub mod promo;
pub mod questions;
pub mod responses;
pub mod share;
pub mod wallet;
