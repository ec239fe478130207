//! What an operation demands of a session.

use uuid::Uuid;

use sitehub_entity::member::MemberRole;

/// The demands an operation places on the admitting session.
///
/// An empty requirement admits any authenticated session. Role and
/// permission demands are both enforced when both are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirement {
    /// Minimum role, inclusive.
    pub min_role: Option<MemberRole>,
    /// A permission the session's set must allow.
    pub permission: Option<String>,
    /// The organization the session must be bound to. When unset, the
    /// gate fills in the resolved tenant's id.
    pub target_organization: Option<Uuid>,
    /// Whether the hostname must resolve to a tenant at all.
    pub require_tenant: bool,
}

impl Requirement {
    /// An authenticated session is enough.
    pub fn authenticated() -> Self {
        Self::default()
    }

    /// Require at least the given role.
    pub fn min_role(mut self, role: MemberRole) -> Self {
        self.min_role = Some(role);
        self
    }

    /// Require a permission.
    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    /// Require the session to be bound to this exact organization,
    /// instead of whatever the hostname resolves to.
    pub fn target_organization(mut self, organization_id: Uuid) -> Self {
        self.target_organization = Some(organization_id);
        self
    }

    /// Require the hostname to resolve to a tenant.
    pub fn require_tenant(mut self) -> Self {
        self.require_tenant = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_composes() {
        let req = Requirement::authenticated()
            .min_role(MemberRole::Admin)
            .permission("sites_write")
            .require_tenant();

        assert_eq!(req.min_role, Some(MemberRole::Admin));
        assert_eq!(req.permission.as_deref(), Some("sites_write"));
        assert!(req.require_tenant);
        assert_eq!(req.target_organization, None);
    }

    #[test]
    fn test_default_admits_any_authenticated_session() {
        let req = Requirement::authenticated();
        assert_eq!(req, Requirement::default());
    }
}
