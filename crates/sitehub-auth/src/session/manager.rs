//! Session lifecycle manager — issuance, verification, revocation.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use sitehub_core::config::session::SessionConfig;
use sitehub_core::error::{AppError, Rejection};
use sitehub_entity::member::{MemberRole, PermissionSet};
use sitehub_entity::session::Session;

use crate::jwt::{Claims, TokenDecoder, TokenEncoder};

use super::store::SessionStore;

/// A token that passed every verification step.
///
/// The persisted row and the decoded claims agree; downstream
/// authorization works off the claims.
#[derive(Debug, Clone)]
pub struct VerifiedSession {
    /// The persisted session row.
    pub session: Session,
    /// The decoded token claims.
    pub claims: Claims,
}

/// Manages the session lifecycle.
///
/// State machine per session: Issued → Valid immediately; → Expired
/// automatically once `expires_at` passes; → Revoked via
/// [`SessionManager::delete_session`]. Expired and Revoked are
/// terminal — a token in either state can never be revalidated.
#[derive(Clone)]
pub struct SessionManager {
    /// Token signing; owns the validity window.
    encoder: Arc<TokenEncoder>,
    /// Token validation.
    decoder: Arc<TokenDecoder>,
    /// Session persistence.
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager").finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Creates a new session manager.
    pub fn new(
        encoder: Arc<TokenEncoder>,
        decoder: Arc<TokenDecoder>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            encoder,
            decoder,
            store,
        }
    }

    /// Creates a manager wired from configuration: the encoder gets
    /// the configured validity window, both sides share the secret.
    pub fn from_config(
        jwt_secret: &str,
        config: &SessionConfig,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        let ttl = Duration::days(config.ttl_days as i64);
        Self::new(
            Arc::new(TokenEncoder::new(jwt_secret, ttl)),
            Arc::new(TokenDecoder::new(jwt_secret)),
            store,
        )
    }

    /// Issues a new session for the user, optionally bound to one
    /// organization with the membership's role and permissions.
    ///
    /// The signed token and the persisted row share the same expiry.
    pub async fn create_session(
        &self,
        user_id: Uuid,
        organization_id: Option<Uuid>,
        role: Option<MemberRole>,
        permissions: &PermissionSet,
    ) -> Result<Session, AppError> {
        let issued = self
            .encoder
            .issue(user_id, organization_id, role, permissions)?;

        let session = self
            .store
            .insert(user_id, &issued.token, issued.expires_at())
            .await?;

        info!(
            user_id = %user_id,
            session_id = %session.id,
            organization_id = ?organization_id,
            "Session created"
        );

        Ok(session)
    }

    /// Verifies a token and returns the backing session.
    ///
    /// Fails with:
    /// - `TokenMalformed` if the token cannot be parsed or its
    ///   signature/shape does not verify
    /// - `TokenExpired` if the token's expiry has passed
    /// - `TokenNotFound` if no persisted row matches — the row is
    ///   authoritative, so a revoked or swept token fails here even
    ///   when its signature is still cryptographically valid
    pub async fn verify(&self, token: &str) -> Result<VerifiedSession, Rejection> {
        let claims = self.decoder.decode(token)?;

        let session = self
            .store
            .find_by_token(token)
            .await?
            .ok_or(Rejection::TokenNotFound)?;

        // The row expiry matches the claim at issuance, but the row is
        // authoritative if they ever disagree.
        if session.is_expired() {
            return Err(Rejection::TokenExpired);
        }

        debug!(user_id = %claims.sub, session_id = %session.id, "Token verified");

        Ok(VerifiedSession { session, claims })
    }

    /// Revokes a session by deleting its row. Idempotent: deleting an
    /// already-absent token is not an error.
    pub async fn delete_session(&self, token: &str) -> Result<(), AppError> {
        let removed = self.store.delete_by_token(token).await?;
        debug!(removed, "Session delete requested");
        Ok(())
    }

    /// Removes every session whose expiry has passed. Maintenance
    /// operation; not part of the request path.
    pub async fn sweep_expired(&self) -> Result<u64, AppError> {
        let swept = self.store.delete_expired(Utc::now()).await?;
        if swept > 0 {
            info!(swept, "Swept expired sessions");
        }
        Ok(swept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::memory::MemorySessionStore;

    const SECRET: &str = "test-secret";

    fn manager_with_ttl(ttl: Duration) -> (SessionManager, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        let manager = SessionManager::new(
            Arc::new(TokenEncoder::new(SECRET, ttl)),
            Arc::new(TokenDecoder::new(SECRET)),
            store.clone(),
        );
        (manager, store)
    }

    fn manager() -> (SessionManager, Arc<MemorySessionStore>) {
        manager_with_ttl(Duration::days(7))
    }

    #[tokio::test]
    async fn test_create_then_verify() {
        let (manager, _) = manager();
        let user_id = Uuid::new_v4();
        let org_id = Uuid::new_v4();

        let session = manager
            .create_session(
                user_id,
                Some(org_id),
                Some(MemberRole::Admin),
                &PermissionSet::wildcard(),
            )
            .await
            .unwrap();

        let verified = manager.verify(&session.token).await.unwrap();
        assert_eq!(verified.session.id, session.id);
        assert_eq!(verified.claims.sub, user_id);
        assert_eq!(verified.claims.org, Some(org_id));
        assert_eq!(verified.claims.role, Some(MemberRole::Admin));
    }

    #[tokio::test]
    async fn test_delete_then_verify_is_not_found() {
        let (manager, _) = manager();

        let session = manager
            .create_session(Uuid::new_v4(), None, None, &PermissionSet::empty())
            .await
            .unwrap();

        manager.delete_session(&session.token).await.unwrap();

        assert_eq!(
            manager.verify(&session.token).await.unwrap_err(),
            Rejection::TokenNotFound
        );
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (manager, _) = manager();

        let session = manager
            .create_session(Uuid::new_v4(), None, None, &PermissionSet::empty())
            .await
            .unwrap();

        manager.delete_session(&session.token).await.unwrap();
        manager.delete_session(&session.token).await.unwrap();
        manager.delete_session("never-existed").await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_session_fails_with_expired() {
        let (manager, _) = manager_with_ttl(Duration::seconds(-1));

        let session = manager
            .create_session(Uuid::new_v4(), None, None, &PermissionSet::empty())
            .await
            .unwrap();

        assert_eq!(
            manager.verify(&session.token).await.unwrap_err(),
            Rejection::TokenExpired
        );
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired() {
        let (expired_manager, store) = manager_with_ttl(Duration::seconds(-10));
        let live_manager = SessionManager::new(
            Arc::new(TokenEncoder::new(SECRET, Duration::days(7))),
            Arc::new(TokenDecoder::new(SECRET)),
            store.clone(),
        );

        expired_manager
            .create_session(Uuid::new_v4(), None, None, &PermissionSet::empty())
            .await
            .unwrap();
        let live = live_manager
            .create_session(Uuid::new_v4(), None, None, &PermissionSet::empty())
            .await
            .unwrap();

        let swept = live_manager.sweep_expired().await.unwrap();
        assert_eq!(swept, 1);
        assert_eq!(store.len().await, 1);

        // Swept-away tokens behave exactly like revoked ones.
        let expired_token = expired_manager
            .create_session(Uuid::new_v4(), None, None, &PermissionSet::empty())
            .await
            .unwrap()
            .token;
        live_manager.sweep_expired().await.unwrap();
        assert_eq!(
            live_manager.verify(&expired_token).await.unwrap_err(),
            Rejection::TokenExpired
        );

        assert!(live_manager.verify(&live.token).await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_verification_of_same_token() {
        let (manager, _) = manager();

        let session = manager
            .create_session(Uuid::new_v4(), None, None, &PermissionSet::empty())
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let manager = manager.clone();
            let token = session.token.clone();
            handles.push(tokio::spawn(async move { manager.verify(&token).await }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
    }
}
