//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod claim_repo;
pub mod coupon_repo;
pub mod engagement_event_repo;
pub mod partner_repo;
pub mod promo_email_repo;
pub mod question_repo;
pub mod response_repo;
pub mod wallet_pass_repo;

pub use claim_repo::{ClaimInput, ClaimRepo};
pub use coupon_repo::CouponRepo;
pub use engagement_event_repo::EngagementEventRepo;
pub use partner_repo::PartnerRepo;
pub use promo_email_repo::PromoEmailRepo;
pub use question_repo::QuestionRepo;
pub use response_repo::ResponseRepo;
pub use wallet_pass_repo::WalletPassRepo;
