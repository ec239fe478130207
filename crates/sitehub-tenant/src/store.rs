//! Read seam over organization persistence.

use std::sync::Arc;

use async_trait::async_trait;

use sitehub_core::AppResult;
use sitehub_database::repositories::OrganizationRepository;
use sitehub_entity::organization::Organization;

/// The two organization lookups tenant resolution performs.
///
/// Read-only: nothing on the admission path writes.
#[async_trait]
pub trait TenantStore: Send + Sync {
    /// Finds the organization whose verified custom domain equals the
    /// hostname. Unverified domains never match.
    async fn find_by_verified_domain(&self, hostname: &str) -> AppResult<Option<Organization>>;

    /// Finds an organization by its slug.
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Organization>>;
}

/// [`TenantStore`] backed by the Postgres organization repository.
#[derive(Debug, Clone)]
pub struct PostgresTenantStore {
    organizations: Arc<OrganizationRepository>,
}

impl PostgresTenantStore {
    /// Create a store over one connection pool.
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self {
            organizations: Arc::new(OrganizationRepository::new(pool)),
        }
    }
}

#[async_trait]
impl TenantStore for PostgresTenantStore {
    async fn find_by_verified_domain(&self, hostname: &str) -> AppResult<Option<Organization>> {
        self.organizations.find_by_verified_domain(hostname).await
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Organization>> {
        self.organizations.find_by_slug(slug).await
    }
}
