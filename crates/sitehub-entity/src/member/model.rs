//! Organization membership model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::permissions::PermissionSet;
use super::role::MemberRole;

/// A user's membership in one organization.
///
/// The (organization_id, user_id) pair is unique; a member holds
/// exactly one role per organization.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrganizationMember {
    /// Unique membership identifier.
    pub id: Uuid,
    /// The organization this membership belongs to.
    pub organization_id: Uuid,
    /// The member user.
    pub user_id: Uuid,
    /// The member's role within this organization.
    pub role: MemberRole,
    /// Explicit permission grants, independent of the role.
    #[sqlx(json)]
    pub permissions: PermissionSet,
    /// The user who issued the invitation, if any.
    pub invited_by: Option<Uuid>,
    /// When the membership was created.
    pub joined_at: DateTime<Utc>,
}

/// Data required to create a new membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMember {
    /// Target organization.
    pub organization_id: Uuid,
    /// The joining user.
    pub user_id: Uuid,
    /// Role to grant.
    pub role: MemberRole,
    /// Validated permission grants.
    pub permissions: PermissionSet,
    /// The inviting user, if any.
    pub invited_by: Option<Uuid>,
}
