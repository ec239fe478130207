//! Organization entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A tenant organization.
///
/// Addressable by its globally unique slug (subdomain) or, once
/// `ssl_verified` is true, by its custom domain.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Organization {
    /// Unique organization identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Globally unique, URL-safe slug used for subdomain resolution.
    pub slug: String,
    /// Optional description.
    pub description: Option<String>,
    /// Logo image URL.
    pub logo_url: Option<String>,
    /// Public website URL.
    pub website_url: Option<String>,
    /// Custom domain, globally unique when set.
    pub custom_domain: Option<String>,
    /// Whether the custom domain's certificate has been verified.
    /// An unverified domain never resolves.
    pub ssl_verified: bool,
    /// Free-form tenant settings.
    pub settings: serde_json::Value,
    /// When the organization was created.
    pub created_at: DateTime<Utc>,
    /// When the organization was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    /// Whether the given hostname matches this organization's verified
    /// custom domain.
    pub fn matches_custom_domain(&self, hostname: &str) -> bool {
        self.ssl_verified && self.custom_domain.as_deref() == Some(hostname)
    }
}

/// Data required to create a new organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrganization {
    /// Display name.
    pub name: String,
    /// URL-safe slug; must be globally unique.
    pub slug: String,
}
