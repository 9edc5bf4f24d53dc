//! Shared response envelope types for API handlers.
//!
//! Plain reads use the `{ "data": ... }` envelope via [`DataResponse`].
//! Claim, redemption, and wallet attempts use [`OutcomeResponse`]: an
//! explicit `success` flag with either a payload or a human-readable
//! rejection message meant to be shown verbatim. Business rejections are
//! payloads, not HTTP errors.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Envelope for operations that can be rejected for business reasons.
///
/// Exactly one of `data` (on success) and `message` (on rejection) is
/// present.
#[derive(Debug, Serialize)]
pub struct OutcomeResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> OutcomeResponse<T> {
    pub fn accepted(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}
