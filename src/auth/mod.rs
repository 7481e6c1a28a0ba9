//! Authentication module providing session issuance, validation, refresh
//! rotation, revocation, and brute-force lockout.
//!
//! This module implements the session half of the security core:
//! - Opaque access/refresh token pairs (256-bit OS randomness, hex encoded)
//! - Absolute token expiry with lazy deletion on validation
//! - Single-use refresh rotation (a refresh token is consumed atomically)
//! - Consecutive-failure lockout with a cooldown window
//!
//! ## Example
//!
//! ```
//! use hireguard::auth::{SessionManager, models::User, store::MemorySessionStore};
//! use hireguard::config::{SecurityConfig, SecurityPolicy};
//! use hireguard::directory::MemoryDirectory;
//! use hireguard::rbac::UserRole;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let directory = Arc::new(MemoryDirectory::new());
//!     directory
//!         .insert(User::new("me@example.com", UserRole::Viewer), "S3cretword")
//!         .await;
//!
//!     let sessions = SessionManager::new(
//!         Arc::new(SecurityPolicy::new(SecurityConfig::default())),
//!         Arc::new(MemorySessionStore::new()),
//!         directory,
//!     );
//!
//!     let pair = sessions.authenticate("me@example.com", "S3cretword").await?;
//!     let rotated = sessions.refresh_token(&pair.refresh_token).await?;
//!     sessions.revoke_session(&rotated.token).await;
//!     Ok(())
//! }
//! ```

pub mod attempts;
pub mod errors;
pub mod manager;
pub mod models;
pub mod store;

pub use attempts::{AttemptGate, LoginAttemptGuard};
pub use errors::{AuthError, AuthResult};
pub use manager::SessionManager;
pub use models::{AuthToken, LoginRequest, SessionTokens, TokenValidation, User, UserId};
pub use store::{MemorySessionStore, SessionStore};
