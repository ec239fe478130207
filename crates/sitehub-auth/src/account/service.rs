//! Registration and login.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use sitehub_core::error::AppError;
use sitehub_core::result::AppResult;
use sitehub_entity::member::PermissionSet;
use sitehub_entity::organization::{NewOrganization, Organization, slugify};
use sitehub_entity::session::Session;
use sitehub_entity::user::{NewUser, User};

use crate::password::PasswordHasher;
use crate::session::SessionManager;

use super::store::AccountStore;

/// Registration request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewAccount {
    /// Email address, unique across all users.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Display name.
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Plaintext password; hashed before it ever reaches the store.
    /// Minimum length is enforced by the service's password policy.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// When set, an organization with this name is created and the new
    /// user becomes its owner.
    pub organization_name: Option<String>,
}

/// Credential login request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// When set, the session is bound to this organization; login fails
    /// unless the user is a member of it.
    pub organization_slug: Option<String>,
}

/// The outcome of a successful registration or login.
#[derive(Debug, Clone)]
pub struct RegisteredAccount {
    /// The user the session belongs to.
    pub user: User,
    /// The organization the session is bound to, if any.
    pub organization: Option<Organization>,
    /// The freshly issued session.
    pub session: Session,
}

/// Registration and login flows.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    hasher: Arc<PasswordHasher>,
    sessions: Arc<SessionManager>,
    /// Minimum accepted password length at registration.
    password_min_length: usize,
}

impl AccountService {
    /// Create a new account service with the default password policy.
    pub fn new(
        store: Arc<dyn AccountStore>,
        hasher: Arc<PasswordHasher>,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            store,
            hasher,
            sessions,
            password_min_length: 8,
        }
    }

    /// Override the minimum password length, from `auth.password_min_length`.
    pub fn with_password_min_length(mut self, min: usize) -> Self {
        self.password_min_length = min;
        self
    }

    /// Registers a new account.
    ///
    /// When an organization name is given, the user, the organization,
    /// and the owner membership are created atomically, and the
    /// returned session is bound to the new organization with the
    /// owner role and the wildcard permission set. Without one, the
    /// session is unbound.
    pub async fn register(&self, request: &NewAccount) -> AppResult<RegisteredAccount> {
        request
            .validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        if request.password.chars().count() < self.password_min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.password_min_length
            )));
        }

        let password_hash = self.hasher.hash_password(&request.password)?;
        let new_user = NewUser {
            email: request.email.to_lowercase(),
            name: request.name.clone(),
            password_hash,
        };

        let new_org = request.organization_name.as_ref().map(|name| NewOrganization {
            name: name.clone(),
            slug: slugify(name),
        });

        let registration = self.store.register(&new_user, new_org.as_ref()).await?;

        let session = match (&registration.organization, &registration.membership) {
            (Some(org), Some(membership)) => {
                self.sessions
                    .create_session(
                        registration.user.id,
                        Some(org.id),
                        Some(membership.role),
                        &membership.permissions,
                    )
                    .await?
            }
            _ => {
                self.sessions
                    .create_session(registration.user.id, None, None, &PermissionSet::empty())
                    .await?
            }
        };

        info!(user_id = %registration.user.id, "Account registered");

        Ok(RegisteredAccount {
            user: registration.user,
            organization: registration.organization,
            session,
        })
    }

    /// Logs a user in with email and password.
    ///
    /// An unknown email and a wrong password fail identically, so the
    /// response does not reveal which emails are registered.
    pub async fn login(&self, request: &LoginRequest) -> AppResult<RegisteredAccount> {
        request
            .validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        let Some(user) = self.store.find_user_by_email(&request.email).await? else {
            warn!(email = %request.email, "Login attempt for unknown email");
            return Err(AppError::authentication("Invalid email or password"));
        };

        if !self
            .hasher
            .verify_password(&request.password, &user.password_hash)?
        {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AppError::authentication("Invalid email or password"));
        }

        let (organization, session) = match &request.organization_slug {
            Some(slug) => {
                let org = self
                    .store
                    .find_organization_by_slug(slug)
                    .await?
                    .ok_or_else(|| {
                        AppError::not_found(format!("Organization '{slug}' not found"))
                    })?;

                let membership = self
                    .store
                    .find_membership(org.id, user.id)
                    .await?
                    .ok_or_else(|| {
                        AppError::authentication(format!(
                            "No membership in organization '{slug}'"
                        ))
                    })?;

                let session = self
                    .sessions
                    .create_session(
                        user.id,
                        Some(org.id),
                        Some(membership.role),
                        &membership.permissions,
                    )
                    .await?;
                (Some(org), session)
            }
            None => {
                let session = self
                    .sessions
                    .create_session(user.id, None, None, &PermissionSet::empty())
                    .await?;
                (None, session)
            }
        };

        info!(
            user_id = %user.id,
            organization = organization.as_ref().map(|o| o.slug.as_str()),
            "Login succeeded"
        );

        Ok(RegisteredAccount {
            user,
            organization,
            session,
        })
    }

    /// Logs out by revoking the session token. Idempotent.
    pub async fn logout(&self, token: &str) -> AppResult<()> {
        self.sessions.delete_session(token).await
    }
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService").finish_non_exhaustive()
    }
}
