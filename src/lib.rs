//! # Hireguard
//!
//! Authentication and session control core for a recruitment platform.
//!
//! This library implements the security-critical subsystem shared by all
//! request handlers of the platform: access/refresh token issuance and
//! lifecycle, brute-force lockout accounting, role-based authorization,
//! and fixed-window request rate limiting. Everything else — HTTP routing,
//! persistence, report generation — lives outside and talks to this crate
//! through the collaborator traits in [`directory`] and [`auth::store`].
//!
//! ## Core Modules
//!
//! - [`auth`]: session manager, login attempt guard, session store
//! - [`rbac`]: roles, permissions, and the static role→permission table
//! - [`security`]: fixed-window rate limiter with per-route budgets
//! - [`config`]: process-wide security policy with atomic reconfiguration
//! - [`directory`]: user lookup and credential verification seam
//!
//! ## Example
//!
//! ```
//! use hireguard::auth::SessionManager;
//! use hireguard::auth::store::MemorySessionStore;
//! use hireguard::config::{SecurityConfig, SecurityPolicy};
//! use hireguard::directory::MemoryDirectory;
//! use hireguard::rbac::UserRole;
//! use hireguard::auth::models::User;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let policy = Arc::new(SecurityPolicy::new(SecurityConfig::default()));
//!     let directory = Arc::new(MemoryDirectory::new());
//!     directory
//!         .insert(User::new("recruiter@example.com", UserRole::Recruiter), "Str0ngEnough")
//!         .await;
//!
//!     let sessions = SessionManager::new(
//!         policy,
//!         Arc::new(MemorySessionStore::new()),
//!         directory,
//!     );
//!
//!     let tokens = sessions
//!         .authenticate("recruiter@example.com", "Str0ngEnough")
//!         .await?;
//!     assert!(sessions.validate_token(&tokens.token).await.is_ok());
//!     Ok(())
//! }
//! ```

/// Session and token lifecycle management.
pub mod auth;
pub use auth::{
    AttemptGate, AuthError, AuthResult, LoginAttemptGuard, SessionManager,
    models::{AuthToken, SessionTokens, TokenValidation, User, UserId},
    store::{MemorySessionStore, SessionStore},
};

/// Process-wide security policy.
pub mod config;
pub use config::{SecurityConfig, SecurityPolicy};

/// User lookup and credential verification collaborators.
pub mod directory;
pub use directory::{MemoryDirectory, UserDirectory};

/// Role-based access control.
pub mod rbac;
pub use rbac::{Permission, UserRole, authorize, role_permissions};

/// Request rate limiting.
pub mod security;
pub use security::{RateLimitConfig, RateLimitDecision, RateLimitError, RateLimiter};
