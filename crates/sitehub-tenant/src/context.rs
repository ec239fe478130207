//! The per-request tenant context.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use sitehub_entity::member::MemberRole;
use sitehub_entity::organization::Organization;

/// Everything an admitted request knows about itself.
///
/// Constructed only by the gate; fields are private and read through
/// accessors so a context can never be mutated after admission.
#[derive(Debug, Clone)]
pub struct TenantContext {
    user_id: Uuid,
    organization: Option<Organization>,
    organization_id: Option<Uuid>,
    role: Option<MemberRole>,
    permissions: Vec<String>,
    is_custom_domain: bool,
    admitted_at: DateTime<Utc>,
}

impl TenantContext {
    pub(crate) fn new(
        user_id: Uuid,
        organization: Option<Organization>,
        organization_id: Option<Uuid>,
        role: Option<MemberRole>,
        permissions: Vec<String>,
        is_custom_domain: bool,
    ) -> Self {
        Self {
            user_id,
            organization,
            organization_id,
            role,
            permissions,
            is_custom_domain,
            admitted_at: Utc::now(),
        }
    }

    /// The authenticated user.
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// The resolved tenant organization, when the hostname named one.
    pub fn organization(&self) -> Option<&Organization> {
        self.organization.as_ref()
    }

    /// The organization the session is bound to, when any.
    pub fn organization_id(&self) -> Option<Uuid> {
        self.organization_id
    }

    /// The session's role within the bound organization.
    pub fn role(&self) -> Option<MemberRole> {
        self.role
    }

    /// The session's permission names.
    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }

    /// Whether the tenant was reached through a verified custom domain.
    pub fn is_custom_domain(&self) -> bool {
        self.is_custom_domain
    }

    /// When the gate admitted the request.
    pub fn admitted_at(&self) -> DateTime<Utc> {
        self.admitted_at
    }
}
