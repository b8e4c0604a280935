use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::{Mutex, PoisonError};

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};

pub const DEFAULT_BURST_PER_MINUTE: u32 = 20;

/// Per-identifier burst guard layered in front of the sliding-window
/// ledger. Where the ledger counts deliberate submissions, this catches a
/// script hammering the submit path many times a second.
pub struct BurstLimiter {
    limiters: Mutex<HashMap<String, RateLimiter<NotKeyed, InMemoryState, DefaultClock>>>,
    quota: Quota,
}

impl BurstLimiter {
    pub fn new(per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN);
        Self {
            limiters: Mutex::new(HashMap::new()),
            quota: Quota::per_minute(per_minute),
        }
    }

    /// Check whether `key` may make another request right now.
    pub fn check(&self, key: &str) -> bool {
        let mut limiters = self
            .limiters
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let limiter = limiters
            .entry(key.to_string())
            .or_insert_with(|| RateLimiter::direct(self.quota));

        limiter.check().is_ok()
    }

    /// Drop all per-key state. Intended for test isolation and teardown.
    pub fn reset(&self) {
        self.limiters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for BurstLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_BURST_PER_MINUTE)
    }
}
