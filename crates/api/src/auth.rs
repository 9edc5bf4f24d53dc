//! Staff authentication: HS256 JWT generation/validation and the
//! [`StaffUser`] extractor.
//!
//! There is no self-service login; staff tokens are minted out of band
//! (ops tooling signs them with the shared secret) and presented as
//! `Authorization: Bearer <token>` on the redemption, analytics, and admin
//! endpoints.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use perkflow_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Role names carried in staff tokens.
pub mod roles {
    /// Can redeem codes and read analytics.
    pub const STAFF: &str = "staff";
    /// Everything staff can, plus content administration.
    pub const ADMIN: &str = "admin";
}

/// JWT claims embedded in every staff token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: an opaque staff identifier (badge id, email, etc.).
    pub sub: String,
    /// The staff member's role name (`"staff"` or `"admin"`).
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4) for revocation / audit.
    pub jti: String,
}

/// Default staff token expiry in minutes (one shift plus slack).
const DEFAULT_TOKEN_EXPIRY_MINS: i64 = 720;

/// Configuration for staff token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Staff token lifetime in minutes (default: 720).
    pub token_expiry_mins: i64,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `JWT_SECRET`             | **yes**  | --      |
    /// | `JWT_TOKEN_EXPIRY_MINS`  | no       | `720`   |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let token_expiry_mins: i64 = std::env::var("JWT_TOKEN_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_TOKEN_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_TOKEN_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            token_expiry_mins,
        }
    }
}

/// Generate an HS256 staff token for the given staff identifier and role.
pub fn generate_staff_token(
    staff_id: &str,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: staff_id.to_string(),
        role: role.to_string(),
        exp: now + config.token_expiry_mins * 60,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a staff token, returning the embedded [`Claims`].
///
/// Validates the signature, expiration, and issued-at claims automatically.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// Authenticated staff member extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires staff
/// authentication:
///
/// ```ignore
/// async fn redeem(staff: StaffUser) -> AppResult<Json<()>> {
///     tracing::info!(staff_id = %staff.staff_id, "redeeming");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct StaffUser {
    /// The staff identifier (from `claims.sub`).
    pub staff_id: String,
    /// The staff member's role name.
    pub role: String,
}

impl StaffUser {
    /// Reject non-admin callers on content administration endpoints.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == roles::ADMIN {
            Ok(())
        } else {
            Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )))
        }
    }
}

impl FromRequestParts<AppState> for StaffUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(StaffUser {
            staff_id: claims.sub,
            role: claims.role,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".into(),
            token_expiry_mins: 15,
        }
    }

    #[test]
    fn token_round_trips() {
        let config = config();
        let token = generate_staff_token("front-desk-3", roles::STAFF, &config).unwrap();
        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "front-desk-3");
        assert_eq!(claims.role, roles::STAFF);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_staff_token("front-desk-3", roles::ADMIN, &config()).unwrap();
        let other = JwtConfig {
            secret: "different-secret".into(),
            token_expiry_mins: 15,
        };
        assert!(validate_token(&token, &other).is_err());
    }
}
