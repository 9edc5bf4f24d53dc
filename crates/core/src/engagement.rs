//! Well-known engagement event type names.
//!
//! These must match the values stored in the `engagement_events.event_type`
//! column and the names the analytics funnel groups by.

/// Visitor landed on a partner-scoped page.
pub const VISIT_PARTNER_PAGE: &str = "visit_partner_page";

/// Visitor highlighted a coupon in the picker.
pub const COUPON_SELECTED: &str = "coupon_selected";

/// A claim was issued for a coupon.
pub const COUPON_CLAIMED: &str = "coupon_claimed";

/// Visitor copied the redemption code.
pub const COPY_CODE: &str = "copy_code";

/// Visitor downloaded the coupon PDF/image.
pub const DOWNLOAD_COUPON: &str = "download_coupon";

/// Visitor started a wallet add.
pub const ADD_TO_WALLET: &str = "add_to_wallet";

/// A wallet pass was successfully issued.
pub const PASS_ADDED: &str = "pass_added";

/// Congratulations screen was shown.
pub const VIEW_CONGRATULATIONS: &str = "view_congratulations";

/// An email address was collected during the flow.
pub const EMAIL_COLLECTED: &str = "email_collected";

/// Visitor accepted the marketing opt-in.
pub const OPT_IN_EMAIL_SUBMITTED: &str = "opt_in_email_submitted";

/// Visitor declined the marketing opt-in.
pub const EMAIL_OPT_IN_SKIPPED: &str = "email_opt_in_skipped";

/// A survey answer was written.
pub const SURVEY_RESPONSE_SUBMITTED: &str = "survey_response_submitted";

/// The survey phase finished.
pub const SURVEY_COMPLETED: &str = "survey_completed";

/// All known event types, in funnel order where one exists.
pub const ALL: &[&str] = &[
    VISIT_PARTNER_PAGE,
    COUPON_SELECTED,
    COUPON_CLAIMED,
    COPY_CODE,
    DOWNLOAD_COUPON,
    ADD_TO_WALLET,
    PASS_ADDED,
    VIEW_CONGRATULATIONS,
    EMAIL_COLLECTED,
    OPT_IN_EMAIL_SUBMITTED,
    EMAIL_OPT_IN_SKIPPED,
    SURVEY_RESPONSE_SUBMITTED,
    SURVEY_COMPLETED,
];

/// Whether the given name is a known engagement event type.
pub fn is_known_event_type(name: &str) -> bool {
    ALL.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_event_types_are_recognized() {
        assert!(is_known_event_type(COUPON_CLAIMED));
        assert!(is_known_event_type(PASS_ADDED));
        assert!(!is_known_event_type("made_up_event"));
    }
}
