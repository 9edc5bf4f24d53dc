//! Wallet pass descriptors and share-link templating.
//!
//! Actual pass issuance (signing, service-account credentials) belongs to
//! the external wallet endpoints; this module only assembles the descriptor
//! POSTed to them and the plain share URL.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Target wallet platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassPlatform {
    Apple,
    Google,
}

impl PassPlatform {
    pub fn as_str(self) -> &'static str {
        match self {
            PassPlatform::Apple => "apple",
            PassPlatform::Google => "google",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "apple" => Ok(PassPlatform::Apple),
            "google" => Ok(PassPlatform::Google),
            other => Err(CoreError::Validation(format!(
                "unknown wallet platform: {other}"
            ))),
        }
    }
}

/// The coupon descriptor POSTed to an external wallet endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct PassDescriptor {
    pub platform: PassPlatform,
    pub coupon_id: Uuid,
    pub title: String,
    pub description: String,
    pub redemption_code: String,
    pub discount: String,
    pub expires_at: Timestamp,
    pub image_url: Option<String>,
    pub partner_id: Option<Uuid>,
}

/// Build the share link for a claim: `<origin>/share/<shareToken>`.
///
/// A plain path segment with no query parameters; expiry lives server-side,
/// the token's unguessability is the only protection.
pub fn share_url(origin: &str, share_token: &str) -> String {
    format!("{}/share/{}", origin.trim_end_matches('/'), share_token)
}
