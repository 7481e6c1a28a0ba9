//! Security module providing request rate limiting.
//!
//! Budgets are fixed-window and keyed per (route, caller identity):
//! - **Login**: 5 requests per 15 minutes
//! - **Registration**: 3 requests per hour
//! - **Refresh**: 10 requests per 15 minutes
//! - **General API**: 100 requests per 15 minutes
//!
//! All budgets are overridable through `RATE_LIMIT_*` environment
//! variables. Callers map a spent budget to a 429 response using the
//! metadata on [`RateLimitError::Exceeded`] and the
//! [`RateLimitDecision::headers`] triple.

pub mod errors;
pub mod rate_limiter;

pub use errors::{RateLimitError, RateLimitResult};
pub use rate_limiter::{RateLimitConfig, RateLimitDecision, RateLimiter};
