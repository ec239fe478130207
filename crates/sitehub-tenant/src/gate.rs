//! The request admission pipeline.

use std::sync::Arc;

use tracing::debug;

use sitehub_auth::SessionManager;
use sitehub_core::error::Rejection;

use crate::context::TenantContext;
use crate::evaluator::AccessEvaluator;
use crate::requirement::Requirement;
use crate::resolver::TenantResolver;

/// Admits or rejects one request.
///
/// The pipeline is fixed: authenticate the bearer token, resolve the
/// hostname, authorize against the requirement, then construct the
/// context. Each stage short-circuits with its own rejection, so a
/// caller always learns the first thing that went wrong. The gate
/// never writes.
#[derive(Clone)]
pub struct RequestGate {
    sessions: Arc<SessionManager>,
    resolver: TenantResolver,
    evaluator: AccessEvaluator,
}

impl RequestGate {
    /// Create a gate over the given session manager and resolver.
    pub fn new(sessions: Arc<SessionManager>, resolver: TenantResolver) -> Self {
        Self {
            sessions,
            resolver,
            evaluator: AccessEvaluator::new(),
        }
    }

    /// Admits a request.
    ///
    /// When the requirement names no target organization, the resolved
    /// tenant's id becomes the target, so a session bound to one
    /// organization cannot act on another organization's hostname.
    pub async fn admit(
        &self,
        hostname: &str,
        bearer_token: Option<&str>,
        requirement: &Requirement,
    ) -> Result<TenantContext, Rejection> {
        let token = match bearer_token {
            Some(token) if !token.trim().is_empty() => token,
            _ => return Err(Rejection::Unauthenticated),
        };

        let verified = self.sessions.verify(token).await?;

        let resolution = self.resolver.resolve(hostname).await?;
        if requirement.require_tenant && resolution.organization.is_none() {
            return Err(Rejection::TenantUnresolved);
        }

        let mut effective = requirement.clone();
        if effective.target_organization.is_none() {
            effective.target_organization = resolution.organization.as_ref().map(|org| org.id);
        }

        self.evaluator
            .authorize(Some(&verified.claims), &effective)?;

        debug!(
            user_id = %verified.claims.sub,
            hostname,
            organization = resolution.organization.as_ref().map(|o| o.slug.as_str()),
            "Request admitted"
        );

        Ok(TenantContext::new(
            verified.claims.sub,
            resolution.organization,
            verified.claims.org,
            verified.claims.role,
            verified.claims.permissions,
            resolution.is_custom_domain,
        ))
    }
}

impl std::fmt::Debug for RequestGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestGate").finish_non_exhaustive()
    }
}
