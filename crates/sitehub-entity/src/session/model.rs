//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted authentication session.
///
/// One row per login; a user may hold multiple concurrent sessions.
/// The row is authoritative: a token whose row is gone is revoked no
/// matter what its signature says.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// The signed token issued for this session.
    pub token: String,
    /// When the session expires. Matches the token's `exp` claim.
    pub expires_at: DateTime<Utc>,
    /// When the session was created (login time).
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Check whether the session has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}
