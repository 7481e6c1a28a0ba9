//! Security configuration management.
//!
//! Consolidates the security knobs shared by every component and provides a
//! process-wide handle whose contents can be swapped atomically at runtime.

use chrono::Duration;
use tokio::sync::RwLock;

/// Process-wide security configuration.
///
/// Loaded once at startup (or built directly in tests) and replaced as a
/// whole via [`SecurityPolicy::reconfigure`] — individual fields are never
/// mutated in place.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Access token lifetime in minutes
    pub token_expiration_minutes: i64,
    /// Consecutive failed logins before an identity is locked out
    pub max_login_attempts: u32,
    /// Minimum accepted credential length
    pub min_password_length: usize,
    /// Idle session timeout in minutes
    pub session_timeout_minutes: i64,
    /// Lockout cooldown in minutes before an identity may retry
    pub lockout_minutes: i64,
    /// Whether multi-factor authentication is required (declared contract,
    /// not consulted by current logic)
    pub mfa_required: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            token_expiration_minutes: 30,
            max_login_attempts: 5,
            min_password_length: 8,
            session_timeout_minutes: 60,
            lockout_minutes: 15,
            mfa_required: false,
        }
    }
}

impl SecurityConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            token_expiration_minutes: parse_env_or(
                "TOKEN_EXPIRATION_MINUTES",
                defaults.token_expiration_minutes,
            ),
            max_login_attempts: parse_env_or("MAX_LOGIN_ATTEMPTS", defaults.max_login_attempts),
            min_password_length: parse_env_or("MIN_PASSWORD_LENGTH", defaults.min_password_length),
            session_timeout_minutes: parse_env_or(
                "SESSION_TIMEOUT_MINUTES",
                defaults.session_timeout_minutes,
            ),
            lockout_minutes: parse_env_or("LOCKOUT_MINUTES", defaults.lockout_minutes),
            mfa_required: parse_env_or("MFA_REQUIRED", defaults.mfa_required),
        }
    }

    /// Access token lifetime as a duration
    pub fn token_ttl(&self) -> Duration {
        Duration::minutes(self.token_expiration_minutes)
    }

    /// Lockout cooldown as a duration
    pub fn lockout_cooldown(&self) -> Duration {
        Duration::minutes(self.lockout_minutes)
    }
}

/// Shared, atomically replaceable security configuration.
///
/// Components hold an `Arc<SecurityPolicy>` and take a snapshot with
/// [`current`](Self::current) at the start of each operation, so a
/// reconfiguration mid-flight is observed by the next operation rather
/// than tearing a running one.
#[derive(Debug)]
pub struct SecurityPolicy {
    inner: RwLock<SecurityConfig>,
}

impl SecurityPolicy {
    /// Create a policy handle around an initial configuration
    pub fn new(config: SecurityConfig) -> Self {
        Self {
            inner: RwLock::new(config),
        }
    }

    /// Snapshot the current configuration
    pub async fn current(&self) -> SecurityConfig {
        self.inner.read().await.clone()
    }

    /// Replace the whole configuration atomically
    pub async fn reconfigure(&self, config: SecurityConfig) {
        log::info!(
            "Security policy reconfigured: token_ttl={}m, max_attempts={}, lockout={}m",
            config.token_expiration_minutes,
            config.max_login_attempts,
            config.lockout_minutes
        );
        *self.inner.write().await = config;
    }
}

/// Parse an environment variable or return a default
fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SecurityConfig::default();
        assert_eq!(config.token_expiration_minutes, 30);
        assert_eq!(config.max_login_attempts, 5);
        assert_eq!(config.min_password_length, 8);
        assert!(!config.mfa_required);
    }

    #[tokio::test]
    async fn test_reconfigure_replaces_whole_struct() {
        let policy = SecurityPolicy::new(SecurityConfig::default());

        policy
            .reconfigure(SecurityConfig {
                max_login_attempts: 3,
                ..SecurityConfig::default()
            })
            .await;

        let current = policy.current().await;
        assert_eq!(current.max_login_attempts, 3);
        // Untouched fields come from the replacement struct, not the old one
        assert_eq!(current.token_expiration_minutes, 30);
    }
}
