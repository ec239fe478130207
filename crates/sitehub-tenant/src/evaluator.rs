//! Pure role and permission evaluation.

use uuid::Uuid;

use sitehub_auth::Claims;
use sitehub_core::error::Rejection;
use sitehub_entity::member::permissions::WILDCARD;

use crate::requirement::Requirement;

/// Evaluates a requirement against session claims.
///
/// Pure and synchronous: no store access, no clock. Check order is
/// fixed so callers get deterministic rejections: organization
/// binding, then role, then permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessEvaluator;

impl AccessEvaluator {
    /// Create an evaluator.
    pub fn new() -> Self {
        Self
    }

    /// Authorizes claims against a requirement.
    ///
    /// `claims: None` means no session is present and fails with
    /// `Unauthenticated` before any other check. When in doubt, a
    /// demand that the claims cannot express (role check on an
    /// unbound session) fails rather than passes.
    pub fn authorize(
        &self,
        claims: Option<&Claims>,
        requirement: &Requirement,
    ) -> Result<(), Rejection> {
        let Some(claims) = claims else {
            return Err(Rejection::Unauthenticated);
        };

        if let Some(target) = requirement.target_organization {
            self.check_organization(claims, target)?;
        }

        if let Some(required) = requirement.min_role {
            let actual = claims.role.filter(|role| role.has_at_least(&required));
            if actual.is_none() {
                return Err(Rejection::InsufficientRole {
                    required: required.as_str().to_owned(),
                    actual: claims
                        .role
                        .map_or_else(|| "none".to_owned(), |r| r.as_str().to_owned()),
                });
            }
        }

        if let Some(required) = &requirement.permission {
            let allowed = claims
                .permissions
                .iter()
                .any(|p| p == WILDCARD || p == required);
            if !allowed {
                return Err(Rejection::InsufficientPermission(required.clone()));
            }
        }

        Ok(())
    }

    fn check_organization(&self, claims: &Claims, target: Uuid) -> Result<(), Rejection> {
        if claims.org == Some(target) {
            Ok(())
        } else {
            Err(Rejection::OrganizationMismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sitehub_entity::member::MemberRole;

    fn claims(
        org: Option<Uuid>,
        role: Option<MemberRole>,
        permissions: &[&str],
    ) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: Uuid::new_v4(),
            org,
            role,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            iat: now,
            exp: now + 3600,
        }
    }

    #[test]
    fn test_no_claims_is_unauthenticated() {
        let result = AccessEvaluator::new().authorize(None, &Requirement::authenticated());
        assert_eq!(result.unwrap_err(), Rejection::Unauthenticated);
    }

    #[test]
    fn test_empty_requirement_admits_any_claims() {
        let claims = claims(None, None, &[]);
        assert!(AccessEvaluator::new()
            .authorize(Some(&claims), &Requirement::authenticated())
            .is_ok());
    }

    #[test]
    fn test_organization_mismatch_beats_role_check() {
        let evaluator = AccessEvaluator::new();
        let claims = claims(Some(Uuid::new_v4()), Some(MemberRole::Viewer), &[]);
        let requirement = Requirement::authenticated()
            .target_organization(Uuid::new_v4())
            .min_role(MemberRole::Owner);

        // Both checks would fail, but the organization check runs first.
        assert_eq!(
            evaluator.authorize(Some(&claims), &requirement).unwrap_err(),
            Rejection::OrganizationMismatch
        );
    }

    #[test]
    fn test_unbound_session_fails_target_organization() {
        let evaluator = AccessEvaluator::new();
        let claims = claims(None, None, &[]);
        let requirement = Requirement::authenticated().target_organization(Uuid::new_v4());

        assert_eq!(
            evaluator.authorize(Some(&claims), &requirement).unwrap_err(),
            Rejection::OrganizationMismatch
        );
    }

    #[test]
    fn test_role_ordering() {
        let evaluator = AccessEvaluator::new();
        let requirement = Requirement::authenticated().min_role(MemberRole::Editor);

        for role in [MemberRole::Owner, MemberRole::Admin, MemberRole::Editor] {
            let claims = claims(None, Some(role), &[]);
            assert!(evaluator.authorize(Some(&claims), &requirement).is_ok());
        }

        let viewer = claims(None, Some(MemberRole::Viewer), &[]);
        assert_eq!(
            evaluator.authorize(Some(&viewer), &requirement).unwrap_err(),
            Rejection::InsufficientRole {
                required: "editor".into(),
                actual: "viewer".into(),
            }
        );
    }

    #[test]
    fn test_roleless_session_fails_role_check() {
        let evaluator = AccessEvaluator::new();
        let claims = claims(None, None, &[]);
        let requirement = Requirement::authenticated().min_role(MemberRole::Viewer);

        assert_eq!(
            evaluator.authorize(Some(&claims), &requirement).unwrap_err(),
            Rejection::InsufficientRole {
                required: "viewer".into(),
                actual: "none".into(),
            }
        );
    }

    #[test]
    fn test_permission_literal_and_wildcard() {
        let evaluator = AccessEvaluator::new();
        let requirement = Requirement::authenticated().permission("sites_write");

        let literal = claims(None, None, &["sites_write"]);
        assert!(evaluator.authorize(Some(&literal), &requirement).is_ok());

        let wildcard = claims(None, None, &["all"]);
        assert!(evaluator.authorize(Some(&wildcard), &requirement).is_ok());

        let other = claims(None, None, &["sites_read"]);
        assert_eq!(
            evaluator.authorize(Some(&other), &requirement).unwrap_err(),
            Rejection::InsufficientPermission("sites_write".into())
        );
    }

    #[test]
    fn test_role_and_permission_both_enforced() {
        let evaluator = AccessEvaluator::new();
        let requirement = Requirement::authenticated()
            .min_role(MemberRole::Admin)
            .permission("billing_manage");

        let role_ok_permission_missing =
            claims(None, Some(MemberRole::Owner), &["sites_write"]);
        assert_eq!(
            evaluator
                .authorize(Some(&role_ok_permission_missing), &requirement)
                .unwrap_err(),
            Rejection::InsufficientPermission("billing_manage".into())
        );

        let both = claims(None, Some(MemberRole::Admin), &["billing_manage"]);
        assert!(evaluator.authorize(Some(&both), &requirement).is_ok());
    }
}
