//! Authentication error types.

use thiserror::Error;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed input rejected before any state is touched
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Wrong identity or secret
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Attempt budget exhausted for this identity
    #[error("Account locked, retry in {retry_after_secs} seconds")]
    Locked {
        /// Seconds until the lockout cooldown expires
        retry_after_secs: u64,
    },

    /// Expired, unknown, revoked, or already-rotated token
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Authenticated but not authorized for the requested permission
    #[error("Permission denied")]
    Forbidden,

    /// The system random source failed to produce token material
    #[error("Token generation failed")]
    TokenGeneration,

    /// Unexpected internal failure; never converted into a security-relevant
    /// outcome
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// HTTP status code the external route layer should map this error to
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 400,
            AuthError::InvalidCredentials | AuthError::InvalidToken => 401,
            AuthError::Forbidden => 403,
            AuthError::Locked { .. } => 423,
            AuthError::TokenGeneration | AuthError::Internal(_) => 500,
        }
    }

    /// Get a client-safe error message that doesn't leak sensitive information
    pub fn client_message(&self) -> String {
        match self {
            // Sanitize internal failures - don't expose system details
            AuthError::TokenGeneration | AuthError::Internal(_) => {
                "Internal server error".to_string()
            }
            // All other errors are safe to expose
            _ => self.to_string(),
        }
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
