//! Atomic registration transaction.
//!
//! Registration that creates a user, an organization, and the owning
//! membership runs as ONE database transaction: if the membership
//! insert fails, neither the user row nor the organization row from
//! that flow persists.

use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;

use sitehub_core::error::{AppError, ErrorKind};
use sitehub_core::result::AppResult;
use sitehub_entity::member::{MemberRole, OrganizationMember, PermissionSet};
use sitehub_entity::organization::{NewOrganization, Organization, is_valid_slug};
use sitehub_entity::user::{NewUser, User};

/// The rows produced by one registration flow.
#[derive(Debug, Clone)]
pub struct Registration {
    /// The created user.
    pub user: User,
    /// The created organization, when one was requested.
    pub organization: Option<Organization>,
    /// The owning membership, when an organization was created.
    pub membership: Option<OrganizationMember>,
}

/// Executes the registration transaction.
#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    /// Create a new registration repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a user, and optionally an organization with the user as
    /// its owner, inside a single transaction.
    pub async fn register(
        &self,
        user: &NewUser,
        organization: Option<&NewOrganization>,
    ) -> AppResult<Registration> {
        if let Some(org) = organization {
            if !is_valid_slug(&org.slug) {
                return Err(AppError::validation(format!(
                    "Invalid organization slug: '{}'",
                    org.slug
                )));
            }
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let created_user = insert_user(&mut tx, user).await?;

        let (created_org, membership) = match organization {
            Some(org) => {
                let created_org = insert_organization(&mut tx, org).await?;
                let membership =
                    insert_owner_membership(&mut tx, created_org.id, created_user.id).await?;
                (Some(created_org), Some(membership))
            }
            None => (None, None),
        };

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit registration", e)
        })?;

        info!(
            user_id = %created_user.id,
            organization = created_org.as_ref().map(|o| o.slug.as_str()),
            "Registration committed"
        );

        Ok(Registration {
            user: created_user,
            organization: created_org,
            membership,
        })
    }
}

async fn insert_user(tx: &mut Transaction<'_, Postgres>, data: &NewUser) -> AppResult<User> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (email, name, password_hash) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(&data.email)
    .bind(&data.name)
    .bind(&data.password_hash)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_email_key") => {
            AppError::conflict(format!("Email '{}' is already registered", data.email))
        }
        _ => AppError::with_source(ErrorKind::Database, "Failed to create user", e),
    })
}

async fn insert_organization(
    tx: &mut Transaction<'_, Postgres>,
    data: &NewOrganization,
) -> AppResult<Organization> {
    sqlx::query_as::<_, Organization>(
        "INSERT INTO organizations (name, slug) VALUES ($1, $2) RETURNING *",
    )
    .bind(&data.name)
    .bind(&data.slug)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err)
            if db_err.constraint() == Some("organizations_slug_key") =>
        {
            AppError::conflict(format!("Organization slug '{}' is taken", data.slug))
        }
        _ => AppError::with_source(ErrorKind::Database, "Failed to create organization", e),
    })
}

async fn insert_owner_membership(
    tx: &mut Transaction<'_, Postgres>,
    organization_id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> AppResult<OrganizationMember> {
    let permissions = serde_json::to_value(PermissionSet::wildcard())?;

    sqlx::query_as::<_, OrganizationMember>(
        "INSERT INTO organization_members (organization_id, user_id, role, permissions) \
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(organization_id)
    .bind(user_id)
    .bind(MemberRole::Owner)
    .bind(permissions)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create owner membership", e))
}
