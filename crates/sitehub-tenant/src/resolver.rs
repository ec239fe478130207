//! Hostname → organization resolution.

use std::sync::Arc;

use tracing::debug;

use sitehub_core::error::Rejection;
use sitehub_entity::organization::Organization;

use crate::store::TenantStore;

/// Subdomain labels that never name a tenant.
const RESERVED_LABELS: &[&str] = &["www", "api", "admin"];

/// The outcome of resolving one hostname.
#[derive(Debug, Clone)]
pub struct TenantResolution {
    /// The resolved organization, when the hostname named one.
    pub organization: Option<Organization>,
    /// Whether resolution matched a verified custom domain rather
    /// than a subdomain slug.
    pub is_custom_domain: bool,
}

impl TenantResolution {
    fn unresolved() -> Self {
        Self {
            organization: None,
            is_custom_domain: false,
        }
    }
}

/// Extracts the candidate slug from a hostname.
///
/// The first dot-separated label is the candidate, unless it is empty
/// or reserved. Matching is case-insensitive and ignores a trailing
/// port.
pub fn subdomain_label(hostname: &str) -> Option<String> {
    let host = hostname.rsplit_once(':').map_or(hostname, |(h, _)| h);
    let label = host.split('.').next()?.trim().to_lowercase();
    if label.is_empty() || RESERVED_LABELS.contains(&label.as_str()) {
        return None;
    }
    Some(label)
}

/// Resolves hostnames to organizations.
///
/// Resolution order: a verified custom domain wins, then a subdomain
/// label matched against organization slugs, then unresolved. At most
/// two reads per call; never writes.
#[derive(Clone)]
pub struct TenantResolver {
    store: Arc<dyn TenantStore>,
}

impl TenantResolver {
    /// Create a resolver over the given store.
    pub fn new(store: Arc<dyn TenantStore>) -> Self {
        Self { store }
    }

    /// Resolves a hostname.
    ///
    /// Returning `organization: None` is a normal outcome, not an
    /// error; only store unavailability is a rejection here.
    pub async fn resolve(&self, hostname: &str) -> Result<TenantResolution, Rejection> {
        let host = hostname
            .rsplit_once(':')
            .map_or(hostname, |(h, _)| h)
            .trim()
            .to_lowercase();
        if host.is_empty() {
            return Ok(TenantResolution::unresolved());
        }

        if let Some(organization) = self.store.find_by_verified_domain(&host).await? {
            debug!(hostname = %host, organization = %organization.slug, "Resolved custom domain");
            return Ok(TenantResolution {
                organization: Some(organization),
                is_custom_domain: true,
            });
        }

        if let Some(label) = subdomain_label(&host) {
            if let Some(organization) = self.store.find_by_slug(&label).await? {
                debug!(hostname = %host, organization = %organization.slug, "Resolved subdomain");
                return Ok(TenantResolution {
                    organization: Some(organization),
                    is_custom_domain: false,
                });
            }
        }

        debug!(hostname = %host, "Hostname did not resolve to a tenant");
        Ok(TenantResolution::unresolved())
    }
}

impl std::fmt::Debug for TenantResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantResolver").finish_non_exhaustive()
    }
}
