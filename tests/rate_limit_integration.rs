//! Integration tests for the fixed-window rate limiter.

use hireguard::security::{RateLimitConfig, RateLimitError, RateLimiter};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;

#[tokio::test]
async fn test_window_budget_then_fresh_window() {
    let limiter = RateLimiter::new();

    // Calls 1-5 allowed with strictly decreasing remaining
    let mut last_remaining = u32::MAX;
    for _ in 0..5 {
        let decision = limiter.allow("203.0.113.9:/api/auth/login", 5, 15).await;
        assert!(decision.allowed);
        assert!(decision.remaining < last_remaining);
        last_remaining = decision.remaining;
    }
    assert_eq!(last_remaining, 0);

    // Call 6 in the same window is denied
    let denied = limiter.allow("203.0.113.9:/api/auth/login", 5, 15).await;
    assert!(!denied.allowed);
    assert!(denied.retry_after_secs() <= 15 * 60);

    // A lapsed window starts fresh with remaining = max - 1
    let fresh = limiter.allow("fresh-key", 5, 0).await;
    assert!(fresh.allowed);
    assert_eq!(fresh.remaining, 4);
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let again = limiter.allow("fresh-key", 5, 0).await;
    assert!(again.allowed);
    assert_eq!(again.remaining, 4);
}

#[tokio::test]
async fn test_concurrent_burst_admits_exactly_budget() {
    let mut routes = HashMap::new();
    routes.insert(
        "login".to_string(),
        RateLimitConfig {
            max_requests: 5,
            window_minutes: 15,
        },
    );
    let limiter = Arc::new(RateLimiter::with_routes(routes));

    let mut join_set = JoinSet::new();
    for _ in 0..100 {
        let limiter = Arc::clone(&limiter);
        join_set.spawn(async move { limiter.check("login", "203.0.113.9").await });
    }

    let mut allowed = 0;
    let mut exceeded = 0;
    while let Some(result) = join_set.join_next().await {
        match result.unwrap() {
            Ok(_) => allowed += 1,
            Err(RateLimitError::Exceeded { .. }) => exceeded += 1,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(allowed, 5, "exactly the budget is admitted under contention");
    assert_eq!(exceeded, 95);
}

#[tokio::test]
async fn test_routes_and_identifiers_are_independent() {
    let mut routes = HashMap::new();
    routes.insert(
        "login".to_string(),
        RateLimitConfig {
            max_requests: 2,
            window_minutes: 15,
        },
    );
    routes.insert(
        "api".to_string(),
        RateLimitConfig {
            max_requests: 2,
            window_minutes: 15,
        },
    );
    let limiter = RateLimiter::with_routes(routes);

    limiter.check("login", "203.0.113.9").await.unwrap();
    limiter.check("login", "203.0.113.9").await.unwrap();
    assert!(limiter.check("login", "203.0.113.9").await.is_err());

    // Same identifier on another route, and another identifier on the same
    // route, both still have budget
    assert!(limiter.check("api", "203.0.113.9").await.is_ok());
    assert!(limiter.check("login", "198.51.100.7").await.is_ok());
}
