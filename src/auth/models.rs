//! Authentication data models.

use crate::rbac::{Permission, UserRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// User ID type
pub type UserId = Uuid;

/// User identity record.
///
/// Created by the external registration flow; this subsystem only reads it
/// and updates `last_login` through the directory collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
    /// Permissions granted explicitly, beyond the role defaults
    pub permissions: HashSet<Permission>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Create an active user with no explicit grants
    pub fn new(email: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            role,
            permissions: HashSet::new(),
            is_active: true,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    /// Add an explicit permission grant
    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.insert(permission);
        self
    }
}

/// Server-side session record, addressable by its access-token value
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub access_token: String,
    pub refresh_token: String,
    /// Authentication identifier (email) the session was issued for
    pub identity: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthToken {
    /// Whether the session has passed its absolute expiry
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Token pair returned to the client on login and refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    pub token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub token_type: String,
}

impl SessionTokens {
    /// Build the wire payload from a stored session record
    pub fn from_session(session: &AuthToken) -> Self {
        Self {
            token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
            expires_at: session.expires_at,
            token_type: "Bearer".to_string(),
        }
    }
}

/// User login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Outcome of a successful token validation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenValidation {
    pub valid: bool,
    pub identity: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_session_expiry_is_absolute() {
        let now = Utc::now();
        let session = AuthToken {
            access_token: "a".into(),
            refresh_token: "r".into(),
            identity: "x@y.com".into(),
            issued_at: now,
            expires_at: now + Duration::minutes(30),
        };

        assert!(!session.is_expired(now));
        assert!(!session.is_expired(now + Duration::minutes(30)));
        assert!(session.is_expired(now + Duration::minutes(31)));
    }

    #[test]
    fn test_login_request_deserializes() {
        let request: LoginRequest =
            serde_json::from_str(r#"{"email":"a@b.com","password":"hunter22"}"#).unwrap();
        assert_eq!(request.email, "a@b.com");
        assert_eq!(request.password, "hunter22");
    }

    #[test]
    fn test_session_tokens_wire_shape() {
        let now = Utc::now();
        let session = AuthToken {
            access_token: "acc".into(),
            refresh_token: "ref".into(),
            identity: "x@y.com".into(),
            issued_at: now,
            expires_at: now,
        };

        let payload = serde_json::to_value(SessionTokens::from_session(&session)).unwrap();
        assert_eq!(payload["token"], "acc");
        assert_eq!(payload["refreshToken"], "ref");
        assert_eq!(payload["tokenType"], "Bearer");
        assert!(payload.get("expiresAt").is_some());
    }
}
