//! Property tests for lockout accounting and rate limit arithmetic.

use hireguard::auth::LoginAttemptGuard;
use hireguard::config::{SecurityConfig, SecurityPolicy};
use hireguard::security::RateLimiter;
use proptest::prelude::*;
use std::sync::Arc;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("runtime")
}

proptest! {
    /// For any attempt budget, the identity is unlocked through failure N-1
    /// and locked from failure N onward.
    #[test]
    fn lockout_engages_exactly_at_budget(max_attempts in 1u32..=10) {
        runtime().block_on(async move {
            let guard = LoginAttemptGuard::new(Arc::new(SecurityPolicy::new(SecurityConfig {
                max_login_attempts: max_attempts,
                ..SecurityConfig::default()
            })));

            for i in 1..max_attempts {
                prop_assert_eq!(guard.record_failure("p@q.com").await, i);
                prop_assert!(!guard.is_locked("p@q.com").await);
            }
            guard.record_failure("p@q.com").await;
            prop_assert!(guard.is_locked("p@q.com").await);
            Ok(())
        })?;
    }

    /// Within one window, remaining decreases by exactly one per allowed
    /// request and the first denial happens at request budget+1.
    #[test]
    fn remaining_decreases_monotonically(budget in 1u32..=20) {
        runtime().block_on(async move {
            let limiter = RateLimiter::new();

            for i in 1..=budget {
                let decision = limiter.allow("key", budget, 15).await;
                prop_assert!(decision.allowed);
                prop_assert_eq!(decision.remaining, budget - i);
            }
            let denied = limiter.allow("key", budget, 15).await;
            prop_assert!(!denied.allowed);
            prop_assert_eq!(denied.remaining, 0);
            Ok(())
        })?;
    }
}
