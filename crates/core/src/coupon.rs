//! Coupon presentation helpers and claim input validation.
//!
//! Everything here runs before any network or database work: expiry
//! formatting and text sanitization shape what visitors see, and
//! [`ClaimRequest::validate`] rejects malformed claims without a round trip.

use serde::Deserialize;
use uuid::Uuid;

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum accepted length for a claimant name.
pub const NAME_MAX_LEN: usize = 100;

/// Minimum accepted length for a device id on a claim.
pub const DEVICE_ID_MIN_LEN: usize = 10;

/// Days-per-week and days-per-month buckets for expiry formatting.
const DAYS_PER_WEEK: i64 = 7;
const DAYS_PER_MONTH: i64 = 30;

// ---------------------------------------------------------------------------
// Expiry formatting
// ---------------------------------------------------------------------------

/// Human-readable time remaining until `expires_at`.
///
/// Buckets, computed from the ceiling of days remaining:
/// - nothing left → `"Expired"`
/// - under a week → `"1 day"` / `"<n> days"`
/// - under a month → floor of weeks, `"1 week"` / `"<n> weeks"`
/// - otherwise → floor of months, `"1 month"` / `"<n> months"`
pub fn format_expiry(expires_at: Timestamp, now: Timestamp) -> String {
    let seconds = (expires_at - now).num_seconds();
    let days = seconds.div_euclid(86_400) + i64::from(seconds.rem_euclid(86_400) > 0);

    if days <= 0 {
        "Expired".to_string()
    } else if days < DAYS_PER_WEEK {
        plural(days, "day")
    } else if days < DAYS_PER_MONTH {
        plural(days / DAYS_PER_WEEK, "week")
    } else {
        plural(days / DAYS_PER_MONTH, "month")
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

// ---------------------------------------------------------------------------
// Sanitization
// ---------------------------------------------------------------------------

/// Strip HTML-unsafe characters from free text and trim the result.
///
/// Applied to every staff- or visitor-supplied string before it is sent
/// over the wire or rendered.
pub fn sanitize_text(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\'' | '&' | '`'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Minimal email plausibility check: one `@` with a dotted domain, no
/// whitespace, sane length. Deliverability is the mail system's problem.
pub fn is_plausible_email(value: &str) -> bool {
    if value.len() > 254 || value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

// ---------------------------------------------------------------------------
// Claim input
// ---------------------------------------------------------------------------

/// Raw claim input as received from the client.
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimRequest {
    pub coupon_id: String,
    pub device_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub referral_token: Option<String>,
}

/// A claim request that passed validation; free text is sanitized.
#[derive(Debug, Clone)]
pub struct ValidatedClaim {
    pub coupon_id: Uuid,
    pub device_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub referral_token: Option<String>,
}

impl ClaimRequest {
    /// Validate and sanitize the claim input.
    ///
    /// Failures never reach the network: a malformed coupon id, an
    /// implausible email, an out-of-range name, or a too-short device id
    /// are all reported as [`CoreError::Validation`] immediately.
    pub fn validate(self) -> Result<ValidatedClaim, CoreError> {
        let coupon_id = Uuid::parse_str(self.coupon_id.trim())
            .map_err(|_| CoreError::Validation("coupon id is not a valid UUID".into()))?;

        let referral_token = self
            .referral_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(ValidatedClaim {
            coupon_id,
            device_id: validate_device_id(self.device_id)?,
            email: validate_email(self.email)?,
            name: validate_name(self.name)?,
            referral_token,
        })
    }
}

/// Claim input arriving through a share link; the coupon is resolved from
/// the share token server-side, so no coupon id is supplied.
#[derive(Debug, Clone, Deserialize)]
pub struct ShareClaimRequest {
    pub device_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// A share-link claim that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedShareClaim {
    pub device_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl ShareClaimRequest {
    /// Validate and sanitize, with the same field rules as a direct claim.
    pub fn validate(self) -> Result<ValidatedShareClaim, CoreError> {
        Ok(ValidatedShareClaim {
            device_id: validate_device_id(self.device_id)?,
            email: validate_email(self.email)?,
            name: validate_name(self.name)?,
        })
    }
}

fn validate_device_id(device_id: Option<String>) -> Result<Option<String>, CoreError> {
    match device_id {
        Some(id) => {
            let id = id.trim().to_string();
            if id.len() < DEVICE_ID_MIN_LEN {
                return Err(CoreError::Validation("device id is too short".into()));
            }
            Ok(Some(id))
        }
        None => Ok(None),
    }
}

fn validate_email(email: Option<String>) -> Result<Option<String>, CoreError> {
    match email {
        Some(email) => {
            let email = email.trim().to_lowercase();
            if !is_plausible_email(&email) {
                return Err(CoreError::Validation("email address is not valid".into()));
            }
            Ok(Some(email))
        }
        None => Ok(None),
    }
}

fn validate_name(name: Option<String>) -> Result<Option<String>, CoreError> {
    match name {
        Some(name) => {
            let name = sanitize_text(&name);
            if name.is_empty() || name.len() > NAME_MAX_LEN {
                return Err(CoreError::Validation(format!(
                    "name must be between 1 and {NAME_MAX_LEN} characters"
                )));
            }
            Ok(Some(name))
        }
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;

    fn request(coupon_id: &str) -> ClaimRequest {
        ClaimRequest {
            coupon_id: coupon_id.to_string(),
            device_id: None,
            email: None,
            name: None,
            referral_token: None,
        }
    }

    #[test]
    fn expiry_buckets_match_the_formatting_rule() {
        let now = Utc::now();
        assert_eq!(format_expiry(now, now), "Expired");
        assert_eq!(format_expiry(now - Duration::hours(5), now), "Expired");
        assert_eq!(format_expiry(now + Duration::hours(20), now), "1 day");
        assert_eq!(format_expiry(now + Duration::days(3), now), "3 days");
        assert_eq!(format_expiry(now + Duration::days(10), now), "1 week");
        assert_eq!(format_expiry(now + Duration::days(21), now), "3 weeks");
        assert_eq!(format_expiry(now + Duration::days(40), now), "1 month");
        assert_eq!(format_expiry(now + Duration::days(95), now), "3 months");
    }

    #[test]
    fn sanitize_strips_markup_characters() {
        assert_eq!(
            sanitize_text("  <b>20% off</b> & \"free\" coffee  "),
            "b20% off/b  free coffee"
        );
        assert_eq!(sanitize_text("plain text"), "plain text");
    }

    #[test]
    fn email_plausibility() {
        assert!(is_plausible_email("visitor@example.com"));
        assert!(!is_plausible_email("no-at-sign"));
        assert!(!is_plausible_email("spaces in@example.com"));
        assert!(!is_plausible_email("trailing@dot."));
    }

    #[test]
    fn malformed_coupon_id_fails_before_any_io() {
        assert_matches!(
            request("not-a-uuid").validate(),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn claim_validation_enforces_field_rules() {
        let coupon_id = uuid::Uuid::new_v4().to_string();

        let mut req = request(&coupon_id);
        req.device_id = Some("short".into());
        assert_matches!(req.validate(), Err(CoreError::Validation(_)));

        let mut req = request(&coupon_id);
        req.email = Some("bogus".into());
        assert_matches!(req.validate(), Err(CoreError::Validation(_)));

        let mut req = request(&coupon_id);
        req.name = Some("x".repeat(NAME_MAX_LEN + 1));
        assert_matches!(req.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn valid_claim_is_sanitized_and_normalized() {
        let coupon_id = uuid::Uuid::new_v4();
        let mut req = request(&coupon_id.to_string());
        req.device_id = Some("abcdef0123456789".into());
        req.email = Some("  Visitor@Example.COM ".into());
        req.name = Some("  <Jamie> ".into());
        req.referral_token = Some("   ".into());

        let valid = req.validate().unwrap();
        assert_eq!(valid.coupon_id, coupon_id);
        assert_eq!(valid.email.as_deref(), Some("visitor@example.com"));
        assert_eq!(valid.name.as_deref(), Some("Jamie"));
        assert!(valid.referral_token.is_none());
    }
}
