//! Session token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sitehub_core::AppError;
use sitehub_entity::member::{MemberRole, PermissionSet};

/// Claims payload embedded in every session token.
///
/// The shape is closed: fixed optional fields for the bound
/// organization and role, an explicit list of permission names, and
/// nothing else. Unknown fields fail deserialization, which the
/// decoder surfaces as a malformed token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Claims {
    /// Subject — the user ID.
    pub sub: Uuid,
    /// Organization this session is bound to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<Uuid>,
    /// The member's role in the bound organization at issuance time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<MemberRole>,
    /// Permission names granted at issuance time. Required even when
    /// empty; a payload without it is malformed.
    pub permissions: Vec<String>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the bound organization ID, if the session is
    /// organization-scoped.
    pub fn organization_id(&self) -> Option<Uuid> {
        self.org
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Re-validates the embedded permission names and returns them as a
    /// normalized set. Fails on malformed names, which callers treat as
    /// a malformed token.
    pub fn permission_set(&self) -> Result<PermissionSet, AppError> {
        PermissionSet::parse(&self.permissions)
    }
}
