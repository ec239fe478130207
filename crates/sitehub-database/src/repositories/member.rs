//! Organization membership repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use sitehub_core::error::{AppError, ErrorKind};
use sitehub_core::result::AppResult;
use sitehub_entity::member::{MemberRole, NewMember, OrganizationMember, PermissionSet};

/// Repository for organization membership operations.
///
/// Roles and permission sets are typed at this boundary, so invalid
/// role strings or malformed permission names are rejected before a
/// row is ever written.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    /// Create a new membership repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the membership for a (user, organization) pair.
    pub async fn find(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> AppResult<Option<OrganizationMember>> {
        sqlx::query_as::<_, OrganizationMember>(
            "SELECT * FROM organization_members WHERE user_id = $1 AND organization_id = $2",
        )
        .bind(user_id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find membership", e))
    }

    /// List all memberships for a user, most recently joined first.
    pub async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<OrganizationMember>> {
        sqlx::query_as::<_, OrganizationMember>(
            "SELECT * FROM organization_members WHERE user_id = $1 ORDER BY joined_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list user memberships", e)
        })
    }

    /// Create a new membership.
    pub async fn create(&self, data: &NewMember) -> AppResult<OrganizationMember> {
        let permissions = serde_json::to_value(&data.permissions)?;

        sqlx::query_as::<_, OrganizationMember>(
            "INSERT INTO organization_members \
                 (organization_id, user_id, role, permissions, invited_by) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(data.organization_id)
        .bind(data.user_id)
        .bind(data.role)
        .bind(permissions)
        .bind(data.invited_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("organization_members_organization_id_user_id_key") =>
            {
                AppError::conflict("User is already a member of this organization".to_string())
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create membership", e),
        })
    }

    /// Change a member's role.
    pub async fn update_role(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        role: MemberRole,
    ) -> AppResult<OrganizationMember> {
        sqlx::query_as::<_, OrganizationMember>(
            "UPDATE organization_members SET role = $3 \
             WHERE user_id = $1 AND organization_id = $2 RETURNING *",
        )
        .bind(user_id)
        .bind(organization_id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update role", e))?
        .ok_or_else(|| AppError::not_found("Membership not found".to_string()))
    }

    /// Replace a member's permission grants.
    pub async fn update_permissions(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        permissions: &PermissionSet,
    ) -> AppResult<OrganizationMember> {
        let permissions = serde_json::to_value(permissions)?;

        sqlx::query_as::<_, OrganizationMember>(
            "UPDATE organization_members SET permissions = $3 \
             WHERE user_id = $1 AND organization_id = $2 RETURNING *",
        )
        .bind(user_id)
        .bind(organization_id)
        .bind(permissions)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update permissions", e))?
        .ok_or_else(|| AppError::not_found("Membership not found".to_string()))
    }

    /// Remove a member from an organization. Returns `true` if a row
    /// was deleted.
    pub async fn delete(&self, user_id: Uuid, organization_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM organization_members WHERE user_id = $1 AND organization_id = $2",
        )
        .bind(user_id)
        .bind(organization_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete membership", e))?;

        Ok(result.rows_affected() > 0)
    }
}
