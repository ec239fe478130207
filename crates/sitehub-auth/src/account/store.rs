//! Persistence seam for the account flows.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use sitehub_core::AppResult;
use sitehub_database::repositories::{
    MemberRepository, OrganizationRepository, Registration, RegistrationRepository, UserRepository,
};
use sitehub_entity::member::OrganizationMember;
use sitehub_entity::organization::{NewOrganization, Organization};
use sitehub_entity::user::{NewUser, User};

/// The reads and writes the account flows need.
///
/// `register` is atomic: when an organization is requested and any of
/// the three inserts fails, none of them persists.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Finds a user by email, case-insensitively.
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Finds an organization by its slug.
    async fn find_organization_by_slug(&self, slug: &str) -> AppResult<Option<Organization>>;

    /// Finds the membership binding a user to an organization.
    async fn find_membership(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<OrganizationMember>>;

    /// Creates a user, and optionally an organization owned by that
    /// user, as one atomic unit.
    async fn register(
        &self,
        user: &NewUser,
        organization: Option<&NewOrganization>,
    ) -> AppResult<Registration>;
}

/// [`AccountStore`] backed by the Postgres repositories.
#[derive(Debug, Clone)]
pub struct PostgresAccountStore {
    users: Arc<UserRepository>,
    organizations: Arc<OrganizationRepository>,
    members: Arc<MemberRepository>,
    registrations: Arc<RegistrationRepository>,
}

impl PostgresAccountStore {
    /// Create a store over one connection pool.
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            organizations: Arc::new(OrganizationRepository::new(pool.clone())),
            members: Arc::new(MemberRepository::new(pool.clone())),
            registrations: Arc::new(RegistrationRepository::new(pool)),
        }
    }
}

#[async_trait]
impl AccountStore for PostgresAccountStore {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.users.find_by_email(email).await
    }

    async fn find_organization_by_slug(&self, slug: &str) -> AppResult<Option<Organization>> {
        self.organizations.find_by_slug(slug).await
    }

    async fn find_membership(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<OrganizationMember>> {
        self.members.find(user_id, organization_id).await
    }

    async fn register(
        &self,
        user: &NewUser,
        organization: Option<&NewOrganization>,
    ) -> AppResult<Registration> {
        self.registrations.register(user, organization).await
    }
}
