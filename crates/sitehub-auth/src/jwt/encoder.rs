//! Session token creation with configurable signing and TTL.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use sitehub_core::error::AppError;
use sitehub_entity::member::{MemberRole, PermissionSet};

use super::claims::Claims;

/// A freshly signed token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The signed, encoded token string.
    pub token: String,
    /// The claims embedded in it.
    pub claims: Claims,
}

impl IssuedToken {
    /// The token's expiry as a `DateTime<Utc>`, matching `claims.exp`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.claims.expires_at()
    }
}

/// Creates signed session tokens (HMAC-SHA256).
#[derive(Clone)]
pub struct TokenEncoder {
    encoding_key: EncodingKey,
    /// Session validity window.
    ttl: Duration,
}

impl std::fmt::Debug for TokenEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenEncoder").field("ttl", &self.ttl).finish()
    }
}

impl TokenEncoder {
    /// Creates a new encoder from the signing secret and validity window.
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Signs a token for the given user, optionally bound to one
    /// organization with the membership's role and permissions.
    pub fn issue(
        &self,
        user_id: Uuid,
        organization_id: Option<Uuid>,
        role: Option<MemberRole>,
        permissions: &PermissionSet,
    ) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let expires_at = now + self.ttl;

        let claims = Claims {
            sub: user_id,
            org: organization_id,
            role,
            permissions: permissions.iter().map(String::from).collect(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode session token: {e}")))?;

        Ok(IssuedToken { token, claims })
    }
}
