//! Session token validation.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use sitehub_core::Rejection;

use super::claims::Claims;

/// Validates signed session tokens.
///
/// Only cryptographic and shape checks happen here; whether a
/// persisted session row still backs the token is the session
/// manager's concern.
#[derive(Clone)]
pub struct TokenDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenDecoder {
    /// Creates a new decoder from the signing secret.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates a token string.
    ///
    /// Checks:
    /// 1. Signature validity and payload shape — `TokenMalformed`
    /// 2. Expiration (`exp` ≤ now, even within clock-skew leeway) —
    ///    `TokenExpired`
    /// 3. Permission names are well formed — `TokenMalformed`
    pub fn decode(&self, token: &str) -> Result<Claims, Rejection> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => Rejection::TokenExpired,
                _ => Rejection::TokenMalformed,
            })?;

        let claims = token_data.claims;

        // The leeway admits tokens expired moments ago; the contract is
        // strict (exp <= now fails), so re-check without leeway.
        if claims.exp <= Utc::now().timestamp() {
            return Err(Rejection::TokenExpired);
        }

        if claims.permission_set().is_err() {
            return Err(Rejection::TokenMalformed);
        }

        Ok(claims)
    }
}
