//! Organization repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use sitehub_core::error::{AppError, ErrorKind};
use sitehub_core::result::AppResult;
use sitehub_entity::organization::{NewOrganization, Organization, is_valid_slug};

/// Repository for organization lookup and tenant-domain operations.
#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    /// Create a new organization repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an organization by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Organization>> {
        sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find organization by id", e)
            })
    }

    /// Find an organization by its slug. Slugs are stored lowercase and
    /// matched exactly.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Organization>> {
        sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find organization by slug", e)
            })
    }

    /// Find an organization whose custom domain matches the hostname
    /// AND whose certificate has been verified. An unverified domain
    /// row never matches, even if present.
    pub async fn find_by_verified_domain(&self, hostname: &str) -> AppResult<Option<Organization>> {
        sqlx::query_as::<_, Organization>(
            "SELECT * FROM organizations WHERE custom_domain = $1 AND ssl_verified = TRUE",
        )
        .bind(hostname)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to find organization by domain",
                e,
            )
        })
    }

    /// Create a new organization. The slug must be URL-safe and
    /// globally unique.
    pub async fn create(&self, data: &NewOrganization) -> AppResult<Organization> {
        if !is_valid_slug(&data.slug) {
            return Err(AppError::validation(format!(
                "Invalid organization slug: '{}'",
                data.slug
            )));
        }

        sqlx::query_as::<_, Organization>(
            "INSERT INTO organizations (name, slug) VALUES ($1, $2) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.slug)
        .fetch_one(&self.pool)
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

    /// Attach a custom domain to an organization. The domain starts
    /// unverified and will not resolve until `mark_ssl_verified`.
    pub async fn set_custom_domain(
        &self,
        organization_id: Uuid,
        domain: Option<&str>,
    ) -> AppResult<Organization> {
        sqlx::query_as::<_, Organization>(
            "UPDATE organizations SET custom_domain = $2, ssl_verified = FALSE, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(organization_id)
        .bind(domain)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("organizations_custom_domain_key") =>
            {
                AppError::conflict("Custom domain is already in use".to_string())
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to set custom domain", e),
        })?
        .ok_or_else(|| AppError::not_found(format!("Organization {organization_id} not found")))
    }

    /// Mark an organization's custom domain as SSL-verified, making it
    /// a valid resolution target.
    pub async fn mark_ssl_verified(&self, organization_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE organizations SET ssl_verified = TRUE, updated_at = NOW() \
             WHERE id = $1 AND custom_domain IS NOT NULL",
        )
        .bind(organization_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark domain verified", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Organization {organization_id} not found or has no custom domain"
            )));
        }
        Ok(())
    }

    /// Replace an organization's settings map.
    pub async fn update_settings(
        &self,
        organization_id: Uuid,
        settings: &serde_json::Value,
    ) -> AppResult<Organization> {
        sqlx::query_as::<_, Organization>(
            "UPDATE organizations SET settings = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(organization_id)
        .bind(settings)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update settings", e))?
        .ok_or_else(|| AppError::not_found(format!("Organization {organization_id} not found")))
    }
}
