//! Membership role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles a member can hold within one organization.
///
/// Roles are ordered by privilege level: Owner > Admin > Editor > Viewer.
/// A member holds exactly one role per organization, but may belong to
/// multiple organizations with different roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Full control of the organization, including member management.
    Owner,
    /// Manages members and settings, but cannot transfer ownership.
    Admin,
    /// Can create and modify tenant content.
    Editor,
    /// Read-only access.
    Viewer,
}

impl MemberRole {
    /// Numeric privilege level; higher outranks lower.
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::Owner => 4,
            Self::Admin => 3,
            Self::Editor => 2,
            Self::Viewer => 1,
        }
    }

    /// Whether this role meets a minimum-role requirement.
    pub fn has_at_least(&self, other: &MemberRole) -> bool {
        self.privilege_level() >= other.privilege_level()
    }

    /// The role's lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MemberRole {
    type Err = sitehub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "editor" => Ok(Self::Editor),
            "viewer" => Ok(Self::Viewer),
            _ => Err(sitehub_core::AppError::validation(format!(
                "Invalid member role: '{s}'. Expected one of: owner, admin, editor, viewer"
            ))),
        }
    }
}
