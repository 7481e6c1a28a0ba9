//! Session manager implementation.

use super::{
    attempts::{AttemptGate, LoginAttemptGuard},
    errors::{AuthError, AuthResult},
    models::{AuthToken, SessionTokens, TokenValidation, User},
    store::SessionStore,
};
use crate::{
    config::{SecurityConfig, SecurityPolicy},
    directory::UserDirectory,
};
use chrono::Utc;
use rand::{TryRngCore, rngs::OsRng};
use std::sync::Arc;

/// Number of random bytes backing each token value (256 bits)
const TOKEN_BYTES: usize = 32;

/// Pre-generated token material.
///
/// Generation is the one fallible step of session minting, so it happens
/// before any state is touched: an error return never leaves a
/// half-committed mutation behind.
struct TokenMaterial {
    access_token: String,
    refresh_token: String,
}

impl TokenMaterial {
    fn generate() -> AuthResult<Self> {
        Ok(Self {
            access_token: generate_token()?,
            refresh_token: generate_token()?,
        })
    }

    /// Assemble the session record; infallible by construction
    fn into_session(self, identity: &str, config: &SecurityConfig) -> AuthToken {
        let now = Utc::now();
        AuthToken {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            identity: identity.to_string(),
            issued_at: now,
            expires_at: now + config.token_ttl(),
        }
    }
}

/// Issues, validates, refreshes, and revokes access/refresh token pairs.
///
/// All state lives behind the injected [`SessionStore`]; user lookup and
/// secret verification are delegated to the [`UserDirectory`] collaborator.
pub struct SessionManager {
    policy: Arc<SecurityPolicy>,
    store: Arc<dyn SessionStore>,
    directory: Arc<dyn UserDirectory>,
    attempts: LoginAttemptGuard,
}

impl SessionManager {
    /// Create a new session manager
    ///
    /// # Arguments
    ///
    /// * `policy` - Shared security configuration
    /// * `store` - Session storage backend
    /// * `directory` - User lookup and credential verification collaborator
    pub fn new(
        policy: Arc<SecurityPolicy>,
        store: Arc<dyn SessionStore>,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        let attempts = LoginAttemptGuard::new(policy.clone());
        Self {
            policy,
            store,
            directory,
            attempts,
        }
    }

    /// The login attempt guard, exposed for administrative unlock
    pub fn attempts(&self) -> &LoginAttemptGuard {
        &self.attempts
    }

    /// Authenticate an identity and issue a token pair
    ///
    /// # Arguments
    ///
    /// * `identity` - Authentication identifier (email)
    /// * `credential` - Secret presented by the caller
    ///
    /// # Returns
    ///
    /// * `AuthResult<SessionTokens>` - Newly issued token pair or error
    ///
    /// # Errors
    ///
    /// * `AuthError::Validation` - Empty identity or credential
    /// * `AuthError::Locked` - Attempt budget exhausted; the credential is
    ///   not verified at all in this state
    /// * `AuthError::InvalidCredentials` - Policy or secret check failed;
    ///   increments the attempt counter
    pub async fn authenticate(&self, identity: &str, credential: &str) -> AuthResult<SessionTokens> {
        if identity.trim().is_empty() {
            return Err(AuthError::Validation("identity must not be empty".into()));
        }
        if credential.is_empty() {
            return Err(AuthError::Validation("credential must not be empty".into()));
        }

        // Token material up front: after this point nothing can fail, so
        // every mutation below commits as a whole.
        let material = TokenMaterial::generate()?;
        let config = self.policy.current().await;

        // Lockout gate and attempt count are one critical section inside
        // the guard: a locked identity never reaches credential
        // verification, and a concurrent burst at the threshold admits no
        // extra verifications.
        let attempt = match self.attempts.check_and_record(identity).await {
            AttemptGate::Locked { retry_after } => {
                return Err(AuthError::Locked {
                    retry_after_secs: retry_after.num_seconds().max(0) as u64,
                });
            }
            AttemptGate::Allowed { attempt } => attempt,
        };

        // Policy check and collaborator secret check are both credential
        // failures from the caller's point of view.
        let credential_ok = credential.len() >= config.min_password_length
            && self.directory.verify_credential(identity, credential).await;

        if !credential_ok {
            log::warn!(
                "Failed authentication for {} (attempt {}/{})",
                identity,
                attempt,
                config.max_login_attempts
            );
            return Err(AuthError::InvalidCredentials);
        }

        self.attempts.reset(identity).await;

        let session = material.into_session(identity, &config);
        let tokens = SessionTokens::from_session(&session);
        self.store.insert(session).await;

        // Best-effort side effect: only applies when a user record exists
        self.directory.touch_last_login(identity).await;

        log::info!("Issued session for {}", identity);
        Ok(tokens)
    }

    /// Validate an access token
    ///
    /// Expiry is evaluated against the wall clock at call time; an expired
    /// session is deleted here rather than by a background sweep.
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidToken` - Unknown, revoked, or expired token
    pub async fn validate_token(&self, access_token: &str) -> AuthResult<TokenValidation> {
        let session = self
            .store
            .get(access_token)
            .await
            .ok_or(AuthError::InvalidToken)?;

        if session.is_expired(Utc::now()) {
            self.store.remove(access_token).await;
            log::debug!("Dropped expired session for {}", session.identity);
            return Err(AuthError::InvalidToken);
        }

        Ok(TokenValidation {
            valid: true,
            identity: session.identity,
            expires_at: session.expires_at,
        })
    }

    /// Exchange a refresh token for a new token pair
    ///
    /// The old session is claimed atomically: of any number of concurrent
    /// calls with the same refresh token, at most one succeeds, and the old
    /// pair is unusable afterwards.
    ///
    /// # Errors
    ///
    /// * `AuthError::Validation` - Empty refresh token
    /// * `AuthError::InvalidToken` - Unknown or already-rotated refresh token
    pub async fn refresh_token(&self, refresh_token: &str) -> AuthResult<SessionTokens> {
        if refresh_token.is_empty() {
            return Err(AuthError::Validation("refresh token must not be empty".into()));
        }

        // Replacement material before the claim: a generation failure must
        // not destroy the old session.
        let material = TokenMaterial::generate()?;
        let config = self.policy.current().await;

        let old = self
            .store
            .take_by_refresh(refresh_token)
            .await
            .ok_or(AuthError::InvalidToken)?;

        let session = material.into_session(&old.identity, &config);
        let tokens = SessionTokens::from_session(&session);
        self.store.insert(session).await;

        log::info!("Rotated session for {}", old.identity);
        Ok(tokens)
    }

    /// Revoke a session by its access token.
    ///
    /// Idempotent: revoking an unknown or already-revoked token is a no-op
    /// success.
    pub async fn revoke_session(&self, access_token: &str) {
        if let Some(session) = self.store.remove(access_token).await {
            log::info!("Revoked session for {}", session.identity);
        }
    }

    /// Resolve the user behind a valid access token
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidToken` - Token invalid, or no user record exists
    ///   for the session's identity
    pub async fn current_user(&self, access_token: &str) -> AuthResult<User> {
        let validation = self.validate_token(access_token).await?;
        self.directory
            .find_by_email(&validation.identity)
            .await
            .ok_or(AuthError::InvalidToken)
    }

    /// Sweep expired sessions out of the store.
    ///
    /// Purely for memory reclamation; validation already drops expired
    /// sessions lazily.
    pub async fn purge_expired(&self) -> usize {
        let purged = self.store.purge_expired(Utc::now()).await;
        if purged > 0 {
            log::debug!("Purged {} expired sessions", purged);
        }
        purged
    }
}

/// Generate a token value from the OS cryptographic random source
fn generate_token() -> AuthResult<String> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|_| AuthError::TokenGeneration)?;
    Ok(hex::encode(bytes))
}
