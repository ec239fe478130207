//! In-memory session store using a Tokio mutex for single-node deployments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use sitehub_core::result::AppResult;
use sitehub_entity::session::Session;

use super::store::SessionStore;

/// In-memory session store keyed by token.
///
/// Suitable for tests and single-node development only; rows vanish on
/// restart.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    /// Protected token → session map.
    sessions: Arc<Mutex<HashMap<String, Session>>>,
}

impl MemorySessionStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions (expired included until swept).
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Whether the store holds no sessions.
    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Session> {
        let session = Session {
            id: Uuid::new_v4(),
            user_id,
            token: token.to_string(),
            expires_at,
            created_at: Utc::now(),
        };

        self.sessions
            .lock()
            .await
            .insert(token.to_string(), session.clone());

        Ok(session)
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Session>> {
        Ok(self.sessions.lock().await.get(token).cloned())
    }

    async fn delete_by_token(&self, token: &str) -> AppResult<bool> {
        Ok(self.sessions.lock().await.remove(token).is_some())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at >= now);
        Ok((before - sessions.len()) as u64)
    }
}
