//! Fixed-window request rate limiting.
//!
//! Windows are fixed, not sliding: a key's first request (or the first one
//! after the stored window lapses) opens a window of `window_minutes`, and
//! every request inside it counts against the budget. A burst straddling a
//! window boundary can therefore admit up to twice the budget in the worst
//! case; this matches the platform's accepted behavior and keeps the state
//! per key to a single counter and timestamp.

use super::errors::{RateLimitError, RateLimitResult};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Request budget for one route
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed per window
    pub max_requests: u32,

    /// Window length in minutes
    pub window_minutes: i64,
}

impl RateLimitConfig {
    /// Budget for the login route
    pub fn login() -> Self {
        Self {
            max_requests: parse_env_or("RATE_LIMIT_LOGIN_REQUESTS", 5),
            window_minutes: parse_env_or("RATE_LIMIT_LOGIN_WINDOW_MINUTES", 15),
        }
    }

    /// Budget for the registration route
    pub fn register() -> Self {
        Self {
            max_requests: parse_env_or("RATE_LIMIT_REGISTER_REQUESTS", 3),
            window_minutes: parse_env_or("RATE_LIMIT_REGISTER_WINDOW_MINUTES", 60),
        }
    }

    /// Budget for the token refresh route
    pub fn refresh() -> Self {
        Self {
            max_requests: parse_env_or("RATE_LIMIT_REFRESH_REQUESTS", 10),
            window_minutes: parse_env_or("RATE_LIMIT_REFRESH_WINDOW_MINUTES", 15),
        }
    }

    /// Budget applied to general API routes
    pub fn api() -> Self {
        Self {
            max_requests: parse_env_or("RATE_LIMIT_API_REQUESTS", 100),
            window_minutes: parse_env_or("RATE_LIMIT_API_WINDOW_MINUTES", 15),
        }
    }
}

/// Per-key window record
#[derive(Debug, Clone)]
struct WindowRecord {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// Outcome of a rate limit check
#[derive(Debug, Clone)]
pub struct RateLimitDecision {
    /// Whether the request fits the window's budget
    pub allowed: bool,
    /// Requests left in the current window
    pub remaining: u32,
    /// When the current window ends
    pub reset_at: DateTime<Utc>,
    /// The window's budget
    pub limit: u32,
}

impl RateLimitDecision {
    /// Seconds until the window resets, clamped at zero
    pub fn retry_after_secs(&self) -> u64 {
        (self.reset_at - Utc::now()).num_seconds().max(0) as u64
    }

    /// `X-RateLimit-*` header triple for the external route layer
    pub fn headers(&self) -> [(&'static str, String); 3] {
        [
            ("X-RateLimit-Limit", self.limit.to_string()),
            ("X-RateLimit-Remaining", self.remaining.to_string()),
            ("X-RateLimit-Reset", self.reset_at.timestamp().to_string()),
        ]
    }
}

/// Fixed-window rate limiter keyed by (route, caller identity)
#[derive(Debug)]
pub struct RateLimiter {
    windows: RwLock<HashMap<String, WindowRecord>>,
    routes: HashMap<String, RateLimitConfig>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    /// Create a rate limiter with the standard route budgets
    pub fn new() -> Self {
        let mut routes = HashMap::new();
        routes.insert("login".to_string(), RateLimitConfig::login());
        routes.insert("register".to_string(), RateLimitConfig::register());
        routes.insert("refresh".to_string(), RateLimitConfig::refresh());
        routes.insert("api".to_string(), RateLimitConfig::api());
        Self::with_routes(routes)
    }

    /// Create a rate limiter with custom route budgets
    pub fn with_routes(routes: HashMap<String, RateLimitConfig>) -> Self {
        Self {
            windows: RwLock::new(HashMap::new()),
            routes,
        }
    }

    /// Count a request against `key`'s window and decide whether it fits.
    ///
    /// Check and increment happen under one write lock, so a burst of
    /// concurrent requests for the same key admits exactly `max_requests`.
    pub async fn allow(
        &self,
        key: &str,
        max_requests: u32,
        window_minutes: i64,
    ) -> RateLimitDecision {
        let now = Utc::now();
        let mut windows = self.windows.write().await;

        if let Some(record) = windows.get_mut(key)
            && now < record.reset_at
        {
            record.count += 1;
            let allowed = record.count <= max_requests;
            if !allowed {
                log::warn!("Rate limit exceeded for {} ({} requests)", key, record.count);
            }
            return RateLimitDecision {
                allowed,
                remaining: max_requests.saturating_sub(record.count),
                reset_at: record.reset_at,
                limit: max_requests,
            };
        }

        // First observation of the key, or its window has lapsed
        let reset_at = now + Duration::minutes(window_minutes);
        windows.insert(key.to_string(), WindowRecord { count: 1, reset_at });
        RateLimitDecision {
            allowed: true,
            remaining: max_requests.saturating_sub(1),
            reset_at,
            limit: max_requests,
        }
    }

    /// Apply the configured budget for `route` to a caller identity.
    ///
    /// # Arguments
    ///
    /// * `route` - Route name (e.g. "login", "api")
    /// * `identifier` - Caller identity (client address)
    ///
    /// # Errors
    ///
    /// * `RateLimitError::UnknownRoute` - No budget configured for `route`
    /// * `RateLimitError::Exceeded` - Budget spent; carries retry metadata
    pub async fn check(&self, route: &str, identifier: &str) -> RateLimitResult<RateLimitDecision> {
        let config = self
            .routes
            .get(route)
            .ok_or_else(|| RateLimitError::UnknownRoute(route.to_string()))?;

        let key = format!("{}:{}", route, identifier);
        let decision = self
            .allow(&key, config.max_requests, config.window_minutes)
            .await;

        if decision.allowed {
            Ok(decision)
        } else {
            Err(RateLimitError::Exceeded {
                retry_after_secs: decision.retry_after_secs(),
                limit: config.max_requests,
                window_minutes: config.window_minutes,
            })
        }
    }

    /// Drop records whose window has lapsed, returning how many.
    ///
    /// Memory reclamation only; `allow` already replaces lapsed windows.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut windows = self.windows.write().await;
        let before = windows.len();
        windows.retain(|_, record| now < record.reset_at);
        before - windows.len()
    }
}

/// Parse an environment variable or return a default
fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
