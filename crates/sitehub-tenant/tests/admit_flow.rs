//! End-to-end admission flow over in-memory stores.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use sitehub_auth::jwt::{TokenDecoder, TokenEncoder};
use sitehub_auth::session::memory::MemorySessionStore;
use sitehub_auth::SessionManager;
use sitehub_core::error::Rejection;
use sitehub_core::AppResult;
use sitehub_entity::member::{MemberRole, PermissionSet};
use sitehub_entity::organization::Organization;
use sitehub_tenant::{Requirement, RequestGate, TenantResolver, TenantStore};

const SECRET: &str = "admit-flow-secret";

#[derive(Default)]
struct MemoryTenantStore {
    organizations: HashMap<Uuid, Organization>,
}

impl MemoryTenantStore {
    fn with_organization(mut self, org: Organization) -> Self {
        self.organizations.insert(org.id, org);
        self
    }
}

#[async_trait]
impl TenantStore for MemoryTenantStore {
    async fn find_by_verified_domain(&self, hostname: &str) -> AppResult<Option<Organization>> {
        Ok(self
            .organizations
            .values()
            .find(|o| o.ssl_verified && o.custom_domain.as_deref() == Some(hostname))
            .cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Organization>> {
        Ok(self.organizations.values().find(|o| o.slug == slug).cloned())
    }
}

fn organization(slug: &str, custom_domain: Option<&str>, ssl_verified: bool) -> Organization {
    Organization {
        id: Uuid::new_v4(),
        name: slug.to_owned(),
        slug: slug.to_owned(),
        description: None,
        logo_url: None,
        website_url: None,
        custom_domain: custom_domain.map(String::from),
        ssl_verified,
        settings: serde_json::json!({}),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

struct Harness {
    gate: RequestGate,
    sessions: Arc<SessionManager>,
}

fn harness(store: MemoryTenantStore) -> Harness {
    let sessions = Arc::new(SessionManager::new(
        Arc::new(TokenEncoder::new(SECRET, Duration::days(7))),
        Arc::new(TokenDecoder::new(SECRET)),
        Arc::new(MemorySessionStore::new()),
    ));
    let resolver = TenantResolver::new(Arc::new(store));
    Harness {
        gate: RequestGate::new(sessions.clone(), resolver),
        sessions,
    }
}

async fn session_for(
    harness: &Harness,
    org: Option<&Organization>,
    role: Option<MemberRole>,
    permissions: PermissionSet,
) -> String {
    harness
        .sessions
        .create_session(Uuid::new_v4(), org.map(|o| o.id), role, &permissions)
        .await
        .unwrap()
        .token
}

#[tokio::test]
async fn admits_member_on_subdomain() {
    let org = organization("acme", None, false);
    let harness = harness(MemoryTenantStore::default().with_organization(org.clone()));
    let token = session_for(
        &harness,
        Some(&org),
        Some(MemberRole::Editor),
        PermissionSet::parse(["sites_write"]).unwrap(),
    )
    .await;

    let context = harness
        .gate
        .admit(
            "acme.sitehub.io",
            Some(&token),
            &Requirement::authenticated()
                .require_tenant()
                .min_role(MemberRole::Editor)
                .permission("sites_write"),
        )
        .await
        .unwrap();

    assert_eq!(context.organization().unwrap().id, org.id);
    assert_eq!(context.organization_id(), Some(org.id));
    assert_eq!(context.role(), Some(MemberRole::Editor));
    assert!(!context.is_custom_domain());
}

#[tokio::test]
async fn admits_on_verified_custom_domain() {
    let org = organization("acme", Some("widgets.example.com"), true);
    let harness = harness(MemoryTenantStore::default().with_organization(org.clone()));
    let token = session_for(
        &harness,
        Some(&org),
        Some(MemberRole::Owner),
        PermissionSet::wildcard(),
    )
    .await;

    let context = harness
        .gate
        .admit(
            "widgets.example.com",
            Some(&token),
            &Requirement::authenticated().require_tenant(),
        )
        .await
        .unwrap();

    assert!(context.is_custom_domain());
    assert_eq!(context.organization().unwrap().id, org.id);
}

#[tokio::test]
async fn verified_custom_domain_wins_over_slug_match() {
    // "acme.example.com" is org A's verified custom domain, while its
    // first label "acme" is org B's slug. Custom-domain resolution
    // runs first, so org A wins.
    let by_domain = organization("widgets", Some("acme.example.com"), true);
    let by_slug = organization("acme", None, false);
    let store = MemoryTenantStore::default()
        .with_organization(by_domain.clone())
        .with_organization(by_slug);

    let resolver = TenantResolver::new(Arc::new(store));
    let resolution = resolver.resolve("acme.example.com").await.unwrap();

    assert_eq!(resolution.organization.unwrap().id, by_domain.id);
    assert!(resolution.is_custom_domain);
}

#[tokio::test]
async fn unverified_custom_domain_does_not_resolve() {
    let org = organization("acme", Some("widgets.example.com"), false);
    let harness = harness(MemoryTenantStore::default().with_organization(org.clone()));
    let token = session_for(&harness, Some(&org), Some(MemberRole::Owner), PermissionSet::wildcard())
        .await;

    let err = harness
        .gate
        .admit(
            "widgets.example.com",
            Some(&token),
            &Requirement::authenticated().require_tenant(),
        )
        .await
        .unwrap_err();

    assert_eq!(err, Rejection::TenantUnresolved);
}

#[tokio::test]
async fn missing_and_empty_tokens_are_unauthenticated() {
    let harness = harness(MemoryTenantStore::default());

    for token in [None, Some(""), Some("   ")] {
        let err = harness
            .gate
            .admit("acme.sitehub.io", token, &Requirement::authenticated())
            .await
            .unwrap_err();
        assert_eq!(err, Rejection::Unauthenticated);
    }
}

#[tokio::test]
async fn garbage_token_is_malformed() {
    let harness = harness(MemoryTenantStore::default());

    let err = harness
        .gate
        .admit(
            "acme.sitehub.io",
            Some("not-a-jwt"),
            &Requirement::authenticated(),
        )
        .await
        .unwrap_err();

    assert_eq!(err, Rejection::TokenMalformed);
}

#[tokio::test]
async fn revoked_token_is_not_found() {
    let harness = harness(MemoryTenantStore::default());
    let token = session_for(&harness, None, None, PermissionSet::empty()).await;

    harness.sessions.delete_session(&token).await.unwrap();

    let err = harness
        .gate
        .admit("acme.sitehub.io", Some(&token), &Requirement::authenticated())
        .await
        .unwrap_err();

    assert_eq!(err, Rejection::TokenNotFound);
}

#[tokio::test]
async fn session_bound_to_other_organization_is_rejected() {
    let acme = organization("acme", None, false);
    let globex = organization("globex", None, false);
    let harness = harness(
        MemoryTenantStore::default()
            .with_organization(acme)
            .with_organization(globex.clone()),
    );

    // Session bound to globex, request on acme's hostname.
    let token = session_for(
        &harness,
        Some(&globex),
        Some(MemberRole::Owner),
        PermissionSet::wildcard(),
    )
    .await;

    let err = harness
        .gate
        .admit(
            "acme.sitehub.io",
            Some(&token),
            &Requirement::authenticated().require_tenant(),
        )
        .await
        .unwrap_err();

    assert_eq!(err, Rejection::OrganizationMismatch);
}

#[tokio::test]
async fn viewer_is_rejected_from_admin_operation() {
    let org = organization("acme", None, false);
    let harness = harness(MemoryTenantStore::default().with_organization(org.clone()));
    let token = session_for(
        &harness,
        Some(&org),
        Some(MemberRole::Viewer),
        PermissionSet::empty(),
    )
    .await;

    let err = harness
        .gate
        .admit(
            "acme.sitehub.io",
            Some(&token),
            &Requirement::authenticated().min_role(MemberRole::Admin),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        Rejection::InsufficientRole {
            required: "admin".into(),
            actual: "viewer".into(),
        }
    );
}

#[tokio::test]
async fn reserved_subdomain_never_resolves() {
    let org = organization("www", None, false);
    let harness = harness(MemoryTenantStore::default().with_organization(org));
    let token = session_for(&harness, None, None, PermissionSet::empty()).await;

    let err = harness
        .gate
        .admit(
            "www.sitehub.io",
            Some(&token),
            &Requirement::authenticated().require_tenant(),
        )
        .await
        .unwrap_err();

    assert_eq!(err, Rejection::TenantUnresolved);
}

#[tokio::test]
async fn unresolved_tenant_is_fine_when_not_required() {
    let harness = harness(MemoryTenantStore::default());
    let token = session_for(&harness, None, None, PermissionSet::empty()).await;

    let context = harness
        .gate
        .admit("unknown.sitehub.io", Some(&token), &Requirement::authenticated())
        .await
        .unwrap();

    assert!(context.organization().is_none());
    assert!(!context.is_custom_domain());
}
