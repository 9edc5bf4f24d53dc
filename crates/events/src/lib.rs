//! PerkFlow engagement recording and delivery infrastructure.
//!
//! - [`EngagementRecorder`] — fire-and-forget event recording: a bounded
//!   channel feeding a background writer, fully decoupled from the
//!   user-facing flow.
//! - [`ChangeFeed`] — in-process publish/subscribe hub for table change
//!   notices, backing the real-time client subscriptions.
//! - [`promo`] — the promotional email dispatcher (SMTP via `lettre`).

pub mod feed;
pub mod promo;
pub mod recorder;

pub use feed::{ChangeFeed, ChangeOp, TableChange};
pub use promo::{PromoDispatcher, PromoMailer, SmtpConfig};
pub use recorder::{EngagementEvent, EngagementRecorder, EventSink, MemorySink, PgSink};
