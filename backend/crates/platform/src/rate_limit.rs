//! Rate Limiting Infrastructure
//!
//! Per-key fixed-window counters.
//!
//! ## Algorithm
//! Each key owns `(window_start, count)`, created on first use. On every call:
//! 1. If `now - window_start >= window`, the window restarts at `now` with a
//!    zero count.
//! 2. The count is incremented.
//! 3. The call is allowed while `count <= max_requests`; otherwise the caller
//!    is told to wait for the rest of the window (rounded up, at least 1s).
//!
//! Counters live behind their own mutex inside a sharded map, so callers on
//! the same key serialize while different keys proceed independently.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::clock::{Clock, SystemClock};

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    pub fn window_ms(&self) -> i64 {
        i64::try_from(self.window.as_millis()).unwrap_or(i64::MAX)
    }
}

/// Rate limit check result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Seconds until the window resets; 0 when allowed
    pub retry_after_secs: u64,
}

impl RateLimitDecision {
    pub const fn allow() -> Self {
        Self {
            allowed: true,
            retry_after_secs: 0,
        }
    }

    pub const fn deny(retry_after_secs: u64) -> Self {
        Self {
            allowed: false,
            retry_after_secs,
        }
    }
}

/// Trait for rate limit storage backends
///
/// Backends never fail: a check always yields a decision.
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Count one request against `key` and decide whether it may proceed
    async fn check(&self, key: &str) -> RateLimitDecision;
}

#[derive(Debug)]
struct WindowCounter {
    window_start: DateTime<Utc>,
    count: u32,
}

/// In-process fixed-window limiter
pub struct FixedWindowRateLimiter {
    config: RateLimitConfig,
    counters: DashMap<String, Arc<Mutex<WindowCounter>>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for FixedWindowRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedWindowRateLimiter")
            .field("config", &self.config)
            .field("keys", &self.counters.len())
            .finish()
    }
}

impl FixedWindowRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            counters: DashMap::new(),
            clock,
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Number of keys currently holding a counter
    pub fn tracked_keys(&self) -> usize {
        self.counters.len()
    }

    /// Drop counters whose window has elapsed, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(self.clock.now())
    }

    fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let window_ms = self.config.window_ms();
        let mut removed = 0;

        // Handles are cloned under the shard lock, so a count of one means no
        // caller is between lookup and update on this counter.
        self.counters.retain(|_, counter| {
            if Arc::strong_count(counter) > 1 {
                return true;
            }
            let expired = match counter.try_lock() {
                Ok(c) => (now - c.window_start).num_milliseconds() >= window_ms,
                Err(_) => false,
            };
            if expired {
                removed += 1;
            }
            !expired
        });

        if removed > 0 {
            tracing::debug!(removed, remaining = self.counters.len(), "Purged rate limit windows");
        }
        removed
    }

    /// Synchronous core of [`RateLimitStore::check`]
    ///
    /// A key seen for the first time triggers a sweep of elapsed windows, so
    /// the map stays bounded by the keys active within one window.
    pub fn check_now(&self, key: &str) -> RateLimitDecision {
        let now = self.clock.now();

        if !self.counters.contains_key(key) {
            self.purge_expired_at(now);
        }

        // Clone the counter handle so the shard lock is released before the
        // per-key mutex is taken.
        let counter = self
            .counters
            .entry(key.to_owned())
            .or_insert_with(|| {
                Arc::new(Mutex::new(WindowCounter {
                    window_start: now,
                    count: 0,
                }))
            })
            .value()
            .clone();

        let mut counter = counter.lock().unwrap_or_else(PoisonError::into_inner);

        let window_ms = self.config.window_ms();
        let mut elapsed_ms = (now - counter.window_start).num_milliseconds();
        if elapsed_ms >= window_ms {
            counter.window_start = now;
            counter.count = 0;
            elapsed_ms = 0;
        }

        counter.count = counter.count.saturating_add(1);
        if counter.count <= self.config.max_requests {
            return RateLimitDecision::allow();
        }

        let remaining_ms = (window_ms - elapsed_ms).max(0);
        let retry_after_secs = u64::try_from((remaining_ms + 999) / 1000)
            .unwrap_or(0)
            .max(1);
        RateLimitDecision::deny(retry_after_secs)
    }
}

impl RateLimitStore for FixedWindowRateLimiter {
    async fn check(&self, key: &str) -> RateLimitDecision {
        self.check_now(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::TimeDelta;

    fn limiter(max: u32, window_secs: u64) -> (FixedWindowRateLimiter, Arc<ManualClock>) {
        let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let limiter =
            FixedWindowRateLimiter::with_clock(RateLimitConfig::new(max, window_secs), clock.clone());
        (limiter, clock)
    }

    #[test]
    fn test_allows_up_to_limit_then_denies() {
        let (limiter, _clock) = limiter(5, 60);

        for _ in 0..5 {
            assert_eq!(limiter.check_now("k"), RateLimitDecision::allow());
        }

        let denied = limiter.check_now("k");
        assert!(!denied.allowed);
        assert!((1..=60).contains(&denied.retry_after_secs));
    }

    #[test]
    fn test_retry_after_counts_down_and_rounds_up() {
        let (limiter, clock) = limiter(1, 60);
        assert!(limiter.check_now("k").allowed);

        clock.advance(TimeDelta::milliseconds(20_500));
        assert_eq!(limiter.check_now("k"), RateLimitDecision::deny(40));

        clock.advance(TimeDelta::milliseconds(39_000));
        assert_eq!(limiter.check_now("k"), RateLimitDecision::deny(1));
    }

    #[test]
    fn test_window_resets_after_elapsing() {
        let (limiter, clock) = limiter(5, 60);
        for _ in 0..6 {
            limiter.check_now("k");
        }
        assert!(!limiter.check_now("k").allowed);

        clock.advance(TimeDelta::seconds(60));
        assert!(limiter.check_now("k").allowed);

        // Counter restarted at 1: four more fit, the sixth does not
        for _ in 0..4 {
            assert!(limiter.check_now("k").allowed);
        }
        assert!(!limiter.check_now("k").allowed);
    }

    #[test]
    fn test_new_key_sweeps_elapsed_windows() {
        let (limiter, clock) = limiter(2, 60);

        limiter.check_now("a");
        clock.advance(TimeDelta::seconds(30));
        limiter.check_now("b");
        assert_eq!(limiter.tracked_keys(), 2);

        // "a" has elapsed, "b" has not
        clock.advance(TimeDelta::seconds(31));
        limiter.check_now("c");
        assert_eq!(limiter.tracked_keys(), 2);

        clock.advance(TimeDelta::seconds(60));
        assert_eq!(limiter.purge_expired(), 2);
        assert_eq!(limiter.tracked_keys(), 0);

        // A swept key starts a fresh window
        assert_eq!(limiter.check_now("a"), RateLimitDecision::allow());
        assert_eq!(limiter.check_now("a"), RateLimitDecision::allow());
        assert!(!limiter.check_now("a").allowed);
    }

    #[test]
    fn test_keys_are_independent() {
        let (limiter, _clock) = limiter(1, 60);
        assert!(limiter.check_now("a").allowed);
        assert!(!limiter.check_now("a").allowed);
        assert!(limiter.check_now("b").allowed);
    }

    #[test]
    fn test_concurrent_callers_share_one_budget() {
        let (limiter, _clock) = limiter(50, 60);
        let limiter = Arc::new(limiter);

        let allowed: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let limiter = Arc::clone(&limiter);
                    scope.spawn(move || {
                        (0..20).filter(|_| limiter.check_now("shared").allowed).count()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(allowed, 50);
    }

    #[tokio::test]
    async fn test_async_store_trait() {
        let (limiter, _clock) = limiter(2, 1);
        assert!(RateLimitStore::check(&limiter, "ip").await.allowed);
        assert!(RateLimitStore::check(&limiter, "ip").await.allowed);
        assert_eq!(
            RateLimitStore::check(&limiter, "ip").await,
            RateLimitDecision::deny(1)
        );
    }
}
