//! User lookup and credential verification collaborators.
//!
//! Persistent user storage is outside this subsystem; the session manager
//! only ever talks to a [`UserDirectory`]. The bundled in-memory
//! implementation backs tests and single-process deployments.

use crate::auth::models::User;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;

/// External collaborator owning user records and secret verification
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up a user record by authentication identifier
    async fn find_by_email(&self, email: &str) -> Option<User>;

    /// Verify a presented credential for an identity.
    ///
    /// Returns `false` for unknown identities; callers cannot distinguish
    /// a missing user from a wrong secret.
    async fn verify_credential(&self, email: &str, credential: &str) -> bool;

    /// Update the user's last-login timestamp, if a record exists
    async fn touch_last_login(&self, email: &str);
}

/// In-memory directory of users and their credentials
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    users: RwLock<HashMap<String, (User, String)>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with its credential
    pub async fn insert(&self, user: User, credential: impl Into<String>) {
        self.users
            .write()
            .await
            .insert(user.email.clone(), (user, credential.into()));
    }

    /// Flip a user's activity flag
    pub async fn set_active(&self, email: &str, active: bool) {
        if let Some((user, _)) = self.users.write().await.get_mut(email) {
            user.is_active = active;
        }
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn find_by_email(&self, email: &str) -> Option<User> {
        self.users.read().await.get(email).map(|(user, _)| user.clone())
    }

    async fn verify_credential(&self, email: &str, credential: &str) -> bool {
        let users = self.users.read().await;
        let Some((_, stored)) = users.get(email) else {
            return false;
        };
        // Constant-time comparison; length mismatch short-circuits inside
        // subtle, not here
        stored.as_bytes().ct_eq(credential.as_bytes()).into()
    }

    async fn touch_last_login(&self, email: &str) {
        if let Some((user, _)) = self.users.write().await.get_mut(email) {
            user.last_login = Some(Utc::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbac::UserRole;

    #[tokio::test]
    async fn test_verify_credential() {
        let directory = MemoryDirectory::new();
        directory
            .insert(User::new("a@b.com", UserRole::Viewer), "hunter22")
            .await;

        assert!(directory.verify_credential("a@b.com", "hunter22").await);
        assert!(!directory.verify_credential("a@b.com", "hunter2").await);
        assert!(!directory.verify_credential("nobody@b.com", "hunter22").await);
    }

    #[tokio::test]
    async fn test_touch_last_login() {
        let directory = MemoryDirectory::new();
        directory
            .insert(User::new("a@b.com", UserRole::Viewer), "hunter22")
            .await;

        assert!(directory.find_by_email("a@b.com").await.unwrap().last_login.is_none());
        directory.touch_last_login("a@b.com").await;
        assert!(directory.find_by_email("a@b.com").await.unwrap().last_login.is_some());

        // No-op for unknown identities
        directory.touch_last_login("nobody@b.com").await;
    }
}
