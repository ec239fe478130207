//! Validated permission sets with wildcard support.

use serde::{Deserialize, Serialize};

use sitehub_core::AppError;

/// The permission value that satisfies any specific permission check.
pub const WILDCARD: &str = "all";

/// A validated set of permission strings attached to a membership or
/// embedded in session claims.
///
/// Permission names are lowercase `snake_case` identifiers. The
/// wildcard `"all"` grants every permission. Sets are normalized
/// (deduplicated, sorted) at construction; invalid names are rejected
/// before persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(Vec<String>);

impl PermissionSet {
    /// An empty permission set.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// A set containing only the wildcard.
    pub fn wildcard() -> Self {
        Self(vec![WILDCARD.to_string()])
    }

    /// Build a validated, normalized set from raw permission strings.
    ///
    /// Fails with a validation error if any name is empty or contains
    /// characters outside `[a-z0-9_]`.
    pub fn parse<I, S>(permissions: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = Vec::new();
        for permission in permissions {
            let name = permission.as_ref();
            if !is_valid_permission(name) {
                return Err(AppError::validation(format!(
                    "Invalid permission name: '{name}'"
                )));
            }
            names.push(name.to_string());
        }
        names.sort_unstable();
        names.dedup();
        Ok(Self(names))
    }

    /// Whether the set grants the given permission, either literally or
    /// through the wildcard.
    pub fn allows(&self, permission: &str) -> bool {
        self.0
            .iter()
            .any(|p| p == permission || p == WILDCARD)
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the permission names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The permission names as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Whether the string is a well-formed permission name.
pub fn is_valid_permission(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_allows_everything() {
        let set = PermissionSet::wildcard();
        assert!(set.allows("manage_users"));
        assert!(set.allows("anything_at_all"));
    }

    #[test]
    fn test_literal_match() {
        let set = PermissionSet::parse(["manage_pages", "view_orders"]).unwrap();
        assert!(set.allows("manage_pages"));
        assert!(!set.allows("manage_users"));
    }

    #[test]
    fn test_parse_rejects_invalid_names() {
        assert!(PermissionSet::parse([""]).is_err());
        assert!(PermissionSet::parse(["Manage-Users"]).is_err());
        assert!(PermissionSet::parse(["has space"]).is_err());
    }

    #[test]
    fn test_parse_normalizes() {
        let set = PermissionSet::parse(["b", "a", "b"]).unwrap();
        assert_eq!(set.as_slice(), &["a".to_string(), "b".to_string()]);
    }
}
