//! Session storage abstraction.
//!
//! Sessions are keyed by access-token value. The trait exists so the
//! in-memory map can later be swapped for a shared store without touching
//! the session manager; `take_by_refresh` is the operation carrying the
//! single-use rotation invariant and must claim atomically.

use super::models::AuthToken;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;

/// Backing store for session records
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Look up a session by its access-token value
    async fn get(&self, access_token: &str) -> Option<AuthToken>;

    /// Insert a session, keyed by its access-token value
    async fn insert(&self, session: AuthToken);

    /// Remove a session, returning it if present
    async fn remove(&self, access_token: &str) -> Option<AuthToken>;

    /// Atomically claim and remove the session owning `refresh_token`.
    ///
    /// At most one concurrent caller may receive the session for a given
    /// refresh-token value; every other caller gets `None`.
    async fn take_by_refresh(&self, refresh_token: &str) -> Option<AuthToken>;

    /// Drop every session expired as of `now`, returning how many
    async fn purge_expired(&self, now: DateTime<Utc>) -> usize;
}

/// In-memory session store guarded by a single process-wide lock
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, AuthToken>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live session records
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, access_token: &str) -> Option<AuthToken> {
        self.sessions.read().await.get(access_token).cloned()
    }

    async fn insert(&self, session: AuthToken) {
        self.sessions
            .write()
            .await
            .insert(session.access_token.clone(), session);
    }

    async fn remove(&self, access_token: &str) -> Option<AuthToken> {
        self.sessions.write().await.remove(access_token)
    }

    async fn take_by_refresh(&self, refresh_token: &str) -> Option<AuthToken> {
        // Scan and remove under a single write lock so a concurrent claim of
        // the same refresh token cannot also succeed. Token comparison is
        // constant-time to avoid leaking prefix matches.
        let mut sessions = self.sessions.write().await;
        let key = sessions.iter().find_map(|(key, session)| {
            let matches: bool = session
                .refresh_token
                .as_bytes()
                .ct_eq(refresh_token.as_bytes())
                .into();
            matches.then(|| key.clone())
        })?;
        sessions.remove(&key)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        before - sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(access: &str, refresh: &str, ttl_minutes: i64) -> AuthToken {
        let now = Utc::now();
        AuthToken {
            access_token: access.into(),
            refresh_token: refresh.into(),
            identity: "x@y.com".into(),
            issued_at: now,
            expires_at: now + Duration::minutes(ttl_minutes),
        }
    }

    #[tokio::test]
    async fn test_insert_get_remove() {
        let store = MemorySessionStore::new();
        store.insert(session("acc", "ref", 30)).await;

        assert!(store.get("acc").await.is_some());
        assert!(store.get("other").await.is_none());
        assert!(store.remove("acc").await.is_some());
        assert!(store.remove("acc").await.is_none());
    }

    #[tokio::test]
    async fn test_take_by_refresh_claims_once() {
        let store = MemorySessionStore::new();
        store.insert(session("acc", "ref", 30)).await;

        let claimed = store.take_by_refresh("ref").await;
        assert!(claimed.is_some());
        assert_eq!(claimed.unwrap().access_token, "acc");

        // A second claim of the same value must fail
        assert!(store.take_by_refresh("ref").await.is_none());
        assert!(store.get("acc").await.is_none());
    }

    #[tokio::test]
    async fn test_purge_expired_keeps_live_sessions() {
        let store = MemorySessionStore::new();
        store.insert(session("live", "r1", 30)).await;
        store.insert(session("dead", "r2", -1)).await;

        let purged = store.purge_expired(Utc::now()).await;
        assert_eq!(purged, 1);
        assert!(store.get("live").await.is_some());
        assert!(store.get("dead").await.is_none());
    }
}
