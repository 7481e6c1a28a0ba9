//! Failed login attempt accounting and lockout.
//!
//! Tracks consecutive authentication failures per identity. Once the count
//! reaches the configured maximum the identity is locked for a cooldown
//! window; the lockout also clears when a successful authentication resets
//! the counter, or when an administrator resets it externally.

use crate::config::{SecurityConfig, SecurityPolicy};
use chrono::{DateTime, Duration, Utc};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

/// Per-identity failure record
#[derive(Debug, Clone)]
struct AttemptRecord {
    failures: u32,
    locked_until: Option<DateTime<Utc>>,
}

/// Outcome of the atomic lockout gate
#[derive(Debug, Clone)]
pub enum AttemptGate {
    /// Attempt admitted; `attempt` is its position in the failure budget
    Allowed { attempt: u32 },
    /// Identity is locked out for the remaining duration
    Locked { retry_after: Duration },
}

/// Tracks consecutive failed logins and enforces temporary lockout
#[derive(Debug)]
pub struct LoginAttemptGuard {
    policy: Arc<SecurityPolicy>,
    attempts: RwLock<HashMap<String, AttemptRecord>>,
}

impl LoginAttemptGuard {
    pub fn new(policy: Arc<SecurityPolicy>) -> Self {
        Self {
            policy,
            attempts: RwLock::new(HashMap::new()),
        }
    }

    /// Atomically run the lockout gate and count this attempt.
    ///
    /// Gate check and increment share one write lock, so a concurrent burst
    /// at the threshold admits no extra credential verifications: the first
    /// caller to reach the budget engages the lockout, and every later
    /// caller is rejected inside the same critical section discipline. The
    /// counted attempt is cleared by [`reset`](Self::reset) when the
    /// authentication it guards succeeds.
    pub async fn check_and_record(&self, identity: &str) -> AttemptGate {
        let config = self.policy.current().await;
        let now = Utc::now();

        let mut attempts = self.attempts.write().await;

        if let Some(record) = attempts.get(identity)
            && let Some(locked_until) = record.locked_until
        {
            if now < locked_until {
                return AttemptGate::Locked {
                    retry_after: locked_until - now,
                };
            }
            // Cooldown lapsed: the identity starts over with a fresh counter
            attempts.remove(identity);
        }

        let record = attempts
            .entry(identity.to_string())
            .or_insert(AttemptRecord {
                failures: 0,
                locked_until: None,
            });
        let attempt = count_attempt(record, &config, identity);
        AttemptGate::Allowed { attempt }
    }

    /// Record a failed attempt for `identity` and return the running count.
    ///
    /// Engages the lockout cooldown once the count reaches the configured
    /// maximum. Increment and lockout decision happen under one write lock
    /// so concurrent failures cannot both observe a pre-threshold count.
    pub async fn record_failure(&self, identity: &str) -> u32 {
        let config = self.policy.current().await;

        let mut attempts = self.attempts.write().await;
        let record = attempts
            .entry(identity.to_string())
            .or_insert(AttemptRecord {
                failures: 0,
                locked_until: None,
            });
        count_attempt(record, &config, identity)
    }

    /// Whether `identity` is currently locked out
    pub async fn is_locked(&self, identity: &str) -> bool {
        self.locked_for(identity).await.is_some()
    }

    /// Remaining lockout duration for `identity`, if locked.
    ///
    /// An expired cooldown lazily clears the whole record, so the identity
    /// starts over with a fresh counter.
    pub async fn locked_for(&self, identity: &str) -> Option<Duration> {
        let mut attempts = self.attempts.write().await;
        let record = attempts.get(identity)?;
        let locked_until = record.locked_until?;

        let now = Utc::now();
        if now < locked_until {
            Some(locked_until - now)
        } else {
            attempts.remove(identity);
            None
        }
    }

    /// Current failure count for `identity`
    pub async fn failures(&self, identity: &str) -> u32 {
        self.attempts
            .read()
            .await
            .get(identity)
            .map_or(0, |record| record.failures)
    }

    /// Clear the counter for `identity` entirely.
    ///
    /// Called on successful authentication, and by external administrative
    /// unlock.
    pub async fn reset(&self, identity: &str) {
        if self.attempts.write().await.remove(identity).is_some() {
            log::debug!("Cleared login attempt counter for {}", identity);
        }
    }
}

/// Count one attempt against the record and engage the lockout at the
/// configured maximum
fn count_attempt(record: &mut AttemptRecord, config: &SecurityConfig, identity: &str) -> u32 {
    record.failures += 1;
    if record.failures >= config.max_login_attempts && record.locked_until.is_none() {
        record.locked_until = Some(Utc::now() + config.lockout_cooldown());
        log::warn!(
            "Identity {} locked out after {} failed attempts ({}m cooldown)",
            identity,
            record.failures,
            config.lockout_minutes
        );
    }
    record.failures
}
