//! Claim and redemption outcomes, and single-use token generation.
//!
//! The persistence layer answers a claim or redemption with exactly one of
//! the closed outcome types below; once a result is parsed into them, no
//! caller ever re-inspects a loose wire shape. Business rejections carry the
//! message shown verbatim to the visitor or staff member.

use serde::Serialize;
use uuid::Uuid;

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Token generation
// ---------------------------------------------------------------------------

/// Length of a redemption code (the literal string encoded in the QR symbol).
pub const REDEMPTION_CODE_LEN: usize = 10;

/// Length of a share token (the capability segment of a share link).
pub const SHARE_TOKEN_LEN: usize = 32;

/// Alphabet for redemption codes: uppercase, with the look-alike characters
/// `0/O/1/I` removed so staff can read codes back over the counter.
const CODE_ALPHABET: &[u8] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";

/// Generate a staff-readable single-use redemption code.
pub fn generate_redemption_code() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    (0..REDEMPTION_CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Generate an unguessable share-link token.
///
/// The token is the only protection on a share link; anyone holding it can
/// claim their own copy of the coupon.
pub fn generate_share_token() -> String {
    use rand::Rng;
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(SHARE_TOKEN_LEN)
        .map(char::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Successful claim payload handed back to the visitor.
#[derive(Debug, Clone, Serialize)]
pub struct AcceptedClaim {
    pub claim_id: Uuid,
    pub coupon_id: Uuid,
    pub redemption_code: String,
    pub share_token: String,
    pub expires_at: Timestamp,
}

/// Result of a claim attempt.
///
/// `Rejected` is an expected business "no" (coupon inactive, expired,
/// share link dead); transport and database failures are ordinary `Err`s
/// and never collapse into this type.
#[derive(Debug, Clone)]
pub enum ClaimOutcome {
    Accepted(AcceptedClaim),
    Rejected { message: String },
}

impl ClaimOutcome {
    pub fn rejected(message: impl Into<String>) -> Self {
        ClaimOutcome::Rejected {
            message: message.into(),
        }
    }
}

/// Successful redemption payload, including claimant details for the staff
/// confirmation display.
#[derive(Debug, Clone, Serialize)]
pub struct RedeemedClaim {
    pub claim_id: Uuid,
    pub coupon_title: String,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

/// Result of a staff QR redemption attempt.
#[derive(Debug, Clone)]
pub enum RedemptionOutcome {
    Redeemed(RedeemedClaim),
    Rejected { message: String },
}

impl RedemptionOutcome {
    pub fn rejected(message: impl Into<String>) -> Self {
        RedemptionOutcome::Rejected {
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redemption_codes_avoid_ambiguous_characters() {
        for _ in 0..50 {
            let code = generate_redemption_code();
            assert_eq!(code.len(), REDEMPTION_CODE_LEN);
            assert!(code.chars().all(|c| !"01OI".contains(c)));
            assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn share_tokens_are_long_and_distinct() {
        let a = generate_share_token();
        let b = generate_share_token();
        assert_eq!(a.len(), SHARE_TOKEN_LEN);
        assert_ne!(a, b);
    }
}
