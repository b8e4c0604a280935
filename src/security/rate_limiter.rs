use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_WINDOW_MS: u64 = 60_000;

/// Hash an identifier (typically the submitter's email) before it is used
/// as a ledger key, so raw addresses never sit in process memory longer
/// than the submission itself.
pub fn hash_identifier(identifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(identifier.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone, Copy)]
struct RateLimitRecord {
    attempts: u32,
    first_attempt_ms: u64,
    reset_at_ms: u64,
}

/// Verdict for a single attempt against the sliding window.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining_attempts: u32,
    pub reset_at_ms: u64,
}

impl RateLimitDecision {
    /// Whole seconds until the window reopens. Zero once it already has.
    pub fn retry_after_seconds(&self) -> u64 {
        self.reset_at_ms.saturating_sub(now_ms()) / 1000
    }
}

/// In-memory sliding-window attempt ledger.
///
/// The window opens on the first counted attempt and resets once it has
/// fully elapsed. Refused attempts do not increment the counter, so
/// `attempts` is bounded by the configured maximum. Entries for expired
/// windows are dropped by [`purge_expired`](Self::purge_expired), driven
/// either manually or by the background sweeper.
#[derive(Default)]
pub struct RateLimitStore {
    entries: Mutex<HashMap<String, RateLimitRecord>>,
}

impl RateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an attempt for `identifier` and decide whether it may proceed.
    pub fn check(&self, identifier: &str, max_attempts: u32, window_ms: u64) -> RateLimitDecision {
        self.check_at(identifier, max_attempts, window_ms, now_ms())
    }

    fn check_at(
        &self,
        identifier: &str,
        max_attempts: u32,
        window_ms: u64,
        now_ms: u64,
    ) -> RateLimitDecision {
        let key = hash_identifier(identifier);
        let mut entries = self.lock_entries();

        let record = entries.entry(key).or_insert(RateLimitRecord {
            attempts: 0,
            first_attempt_ms: now_ms,
            reset_at_ms: now_ms + window_ms,
        });

        // Window elapsed: start a fresh one for this attempt.
        if now_ms > record.reset_at_ms {
            *record = RateLimitRecord {
                attempts: 0,
                first_attempt_ms: now_ms,
                reset_at_ms: now_ms + window_ms,
            };
        }

        if record.attempts >= max_attempts {
            tracing::trace!(
                window_started_ms = record.first_attempt_ms,
                "rate limit window exhausted"
            );
            return RateLimitDecision {
                allowed: false,
                remaining_attempts: 0,
                reset_at_ms: record.reset_at_ms,
            };
        }

        record.attempts += 1;
        RateLimitDecision {
            allowed: true,
            remaining_attempts: max_attempts - record.attempts,
            reset_at_ms: record.reset_at_ms,
        }
    }

    /// Drop every entry whose window has fully elapsed. Returns the number
    /// of entries removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(now_ms())
    }

    fn purge_expired_at(&self, now_ms: u64) -> usize {
        let mut entries = self.lock_entries();
        let before = entries.len();
        entries.retain(|_, record| now_ms <= record.reset_at_ms);
        before - entries.len()
    }

    /// Forget everything. Intended for test isolation and teardown.
    pub fn clear(&self) {
        self.lock_entries().clear();
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Spawn a background task that purges expired entries on a fixed
    /// period, bounding ledger memory for the life of the process. The
    /// returned handle cancels the task on [`SweeperHandle::shutdown`] or
    /// drop, so a torn-down context cannot leak a live timer.
    pub fn start_sweeper(self: &Arc<Self>, period: Duration) -> SweeperHandle {
        let store = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let removed = store.purge_expired();
                if removed > 0 {
                    tracing::debug!(removed, "purged expired rate-limit entries");
                }
            }
        });
        SweeperHandle { handle }
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, RateLimitRecord>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Cancellation handle for the ledger sweeper task.
pub struct SweeperHandle {
    handle: tokio::task::JoinHandle<()>,
}

impl SweeperHandle {
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: u64 = 1_700_000_000_000;

    #[test]
    fn attempts_count_down_then_refuse() {
        let store = RateLimitStore::new();

        let first = store.check_at("x@y.com", 3, 60_000, T0);
        assert!(first.allowed);
        assert_eq!(first.remaining_attempts, 2);
        assert_eq!(first.reset_at_ms, T0 + 60_000);

        let second = store.check_at("x@y.com", 3, 60_000, T0 + 1_000);
        assert!(second.allowed);
        assert_eq!(second.remaining_attempts, 1);

        let third = store.check_at("x@y.com", 3, 60_000, T0 + 2_000);
        assert!(third.allowed);
        assert_eq!(third.remaining_attempts, 0);

        let fourth = store.check_at("x@y.com", 3, 60_000, T0 + 3_000);
        assert!(!fourth.allowed);
        assert_eq!(fourth.remaining_attempts, 0);
        assert_eq!(fourth.reset_at_ms, T0 + 60_000);
    }

    #[test]
    fn refusals_do_not_grow_the_counter() {
        let store = RateLimitStore::new();
        for offset in 0..10 {
            store.check_at("x@y.com", 3, 60_000, T0 + offset);
        }
        // Window still live: the very next attempt after reset must be
        // allowed, proving refusals were not counted against the new window.
        let after_reset = store.check_at("x@y.com", 3, 60_000, T0 + 60_001);
        assert!(after_reset.allowed);
        assert_eq!(after_reset.remaining_attempts, 2);
    }

    #[test]
    fn window_reset_reopens_the_gate() {
        let store = RateLimitStore::new();
        for offset in 0..4 {
            store.check_at("x@y.com", 3, 60_000, T0 + offset);
        }
        let fifth = store.check_at("x@y.com", 3, 60_000, T0 + 61_000);
        assert!(fifth.allowed);
        assert_eq!(fifth.reset_at_ms, T0 + 61_000 + 60_000);
    }

    #[test]
    fn identifiers_are_independent() {
        let store = RateLimitStore::new();
        for offset in 0..3 {
            store.check_at("a@example.com", 3, 60_000, T0 + offset);
        }
        assert!(!store.check_at("a@example.com", 3, 60_000, T0 + 10).allowed);
        assert!(store.check_at("b@example.com", 3, 60_000, T0 + 10).allowed);
    }

    #[test]
    fn purge_drops_only_expired_windows() {
        let store = RateLimitStore::new();
        store.check_at("old@example.com", 3, 60_000, T0);
        store.check_at("new@example.com", 3, 60_000, T0 + 30_000);
        assert_eq!(store.len(), 2);

        let removed = store.purge_expired_at(T0 + 61_000);
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clear_empties_the_ledger() {
        let store = RateLimitStore::new();
        store.check_at("x@y.com", 3, 60_000, T0);
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn hashed_keys_are_stable_hex() {
        let a = hash_identifier("x@y.com");
        let b = hash_identifier("x@y.com");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, hash_identifier("other@y.com"));
    }

    #[tokio::test]
    async fn sweeper_can_be_shut_down() {
        let store = Arc::new(RateLimitStore::new());
        let sweeper = store.start_sweeper(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(30)).await;
        sweeper.shutdown();
    }
}
