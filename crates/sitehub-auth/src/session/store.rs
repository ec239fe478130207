//! Session persistence behind a trait.
//!
//! The session manager talks to the credential store through
//! [`SessionStore`] so that PostgreSQL can back production while the
//! in-memory implementation backs tests and single-node development.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use sitehub_core::result::AppResult;
use sitehub_database::repositories::SessionRepository;
use sitehub_entity::session::Session;

/// Persistence operations the session manager needs.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a new session row.
    async fn insert(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Session>;

    /// Find a session by its token.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<Session>>;

    /// Delete a session by its token. Returns `true` if a row existed.
    async fn delete_by_token(&self, token: &str) -> AppResult<bool>;

    /// Delete all sessions expiring strictly before `now`; returns the
    /// number of rows removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// PostgreSQL-backed session store.
#[derive(Debug, Clone)]
pub struct PostgresSessionStore {
    repo: Arc<SessionRepository>,
}

impl PostgresSessionStore {
    /// Create a new store over the session repository.
    pub fn new(repo: Arc<SessionRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn insert(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Session> {
        self.repo.insert(user_id, token, expires_at).await
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Session>> {
        self.repo.find_by_token(token).await
    }

    async fn delete_by_token(&self, token: &str) -> AppResult<bool> {
        self.repo.delete_by_token(token).await
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        self.repo.delete_expired(now).await
    }
}
