//! Error types for the rate limiting module.

use thiserror::Error;

/// Rate limiting errors
#[derive(Debug, Error)]
pub enum RateLimitError {
    /// Budget for the window is spent
    #[error("Rate limit exceeded: retry in {retry_after_secs} seconds")]
    Exceeded {
        /// Seconds until the current window resets
        retry_after_secs: u64,
        /// Request budget for the window
        limit: u32,
        /// Window length in minutes
        window_minutes: i64,
    },

    /// No budget is configured for the named route
    #[error("Unknown rate limit route: {0}")]
    UnknownRoute(String),
}

impl RateLimitError {
    /// HTTP status code the external route layer should map this error to
    pub fn status_code(&self) -> u16 {
        match self {
            RateLimitError::Exceeded { .. } => 429,
            RateLimitError::UnknownRoute(_) => 500,
        }
    }

    /// Get a client-safe error message
    pub fn client_message(&self) -> String {
        match self {
            // Route table contents are an internal detail
            RateLimitError::UnknownRoute(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for rate limiting operations
pub type RateLimitResult<T> = Result<T, RateLimitError>;
