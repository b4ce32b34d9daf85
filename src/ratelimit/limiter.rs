//! Per-actor sliding-window rate limiter.

use dashmap::DashMap;
use tracing::{debug, trace};

use super::window::{Quota, SlidingWindow};
use crate::clock::{Clock, SystemClock};
use crate::types::UserId;

/// Tracks admitted requests per actor and decides whether a new one is over quota.
///
/// Each actor's window lives in its own map entry. The check-and-record step runs
/// under that entry's shard lock, so two calls for the same actor never both see
/// the pre-update window, while calls for other actors proceed independently.
pub struct RateLimiter<C: Clock = SystemClock> {
    /// Request windows indexed by actor
    windows: DashMap<UserId, SlidingWindow>,
    quota: Quota,
    clock: C,
}

impl RateLimiter<SystemClock> {
    /// Create a limiter backed by the system clock.
    pub fn new(quota: Quota) -> Self {
        Self::with_clock(quota, SystemClock)
    }
}

impl<C: Clock> RateLimiter<C> {
    pub fn with_clock(quota: Quota, clock: C) -> Self {
        Self {
            windows: DashMap::new(),
            quota,
            clock,
        }
    }

    /// Whether `actor` is currently over quota.
    ///
    /// When the answer is `false` the attempt is recorded as consumed quota.
    /// A limited attempt is never recorded.
    pub fn is_rate_limited(&self, actor: UserId) -> bool {
        let now = self.clock.now();
        let mut window = self.windows.entry(actor).or_default();
        let admitted = window.try_admit(now, self.quota);

        if admitted {
            trace!(user = %actor, in_window = window.len(), "Request admitted");
        } else {
            debug!(
                user = %actor,
                retry_after = ?window.retry_after(now, self.quota.window),
                "Rate limit exceeded"
            );
        }

        !admitted
    }

    /// Prune stale timestamps for every actor and drop windows left empty.
    ///
    /// Returns the number of actor entries removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let before = self.windows.len();
        self.windows.retain(|_, window| {
            window.prune(now, self.quota.window);
            !window.is_empty()
        });
        before.saturating_sub(self.windows.len())
    }

    /// Admitted requests currently counted against `actor`.
    pub fn requests_in_window(&self, actor: UserId) -> usize {
        self.windows.get(&actor).map(|w| w.len()).unwrap_or(0)
    }

    /// Number of tracked actors.
    pub fn actor_count(&self) -> usize {
        self.windows.len()
    }

    pub fn quota(&self) -> Quota {
        self.quota
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::Arc;
    use std::time::Duration;

    fn limiter(max: usize, secs: u64) -> (RateLimiter<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let limiter =
            RateLimiter::with_clock(Quota::new(max, Duration::from_secs(secs)), clock.clone());
        (limiter, clock)
    }

    #[test]
    fn test_rate_limiter_creation() {
        let (limiter, _) = limiter(10, 60);
        assert_eq!(limiter.actor_count(), 0);
        assert_eq!(limiter.quota(), Quota::default());
    }

    #[test]
    fn test_limited_after_max_requests() {
        let (limiter, _) = limiter(10, 60);
        let user = UserId(1);

        for _ in 0..10 {
            assert!(!limiter.is_rate_limited(user));
        }
        assert!(limiter.is_rate_limited(user));
    }

    #[test]
    fn test_recovers_when_oldest_leaves_window() {
        let (limiter, clock) = limiter(2, 60);
        let user = UserId(1);

        assert!(!limiter.is_rate_limited(user));
        clock.advance(Duration::from_secs(10));
        assert!(!limiter.is_rate_limited(user));
        assert!(limiter.is_rate_limited(user));

        // First hit leaves the window; the second is still inside.
        clock.advance(Duration::from_secs(50));
        assert!(!limiter.is_rate_limited(user));
        assert!(limiter.is_rate_limited(user));
    }

    #[test]
    fn test_retrying_while_limited_does_not_extend_window() {
        let (limiter, clock) = limiter(1, 60);
        let user = UserId(1);

        assert!(!limiter.is_rate_limited(user));
        for _ in 0..59 {
            clock.advance(Duration::from_secs(1));
            assert!(limiter.is_rate_limited(user));
        }
        assert_eq!(limiter.requests_in_window(user), 1);

        clock.advance(Duration::from_secs(1));
        assert!(!limiter.is_rate_limited(user));
    }

    #[test]
    fn test_actors_are_independent() {
        let (limiter, _) = limiter(1, 60);

        assert!(!limiter.is_rate_limited(UserId(1)));
        assert!(!limiter.is_rate_limited(UserId(2)));
        assert!(limiter.is_rate_limited(UserId(1)));
        assert!(limiter.is_rate_limited(UserId(2)));
        assert_eq!(limiter.actor_count(), 2);
    }

    #[test]
    fn test_sweep_drops_idle_actors() {
        let (limiter, clock) = limiter(5, 60);

        limiter.is_rate_limited(UserId(1));
        clock.advance(Duration::from_secs(30));
        limiter.is_rate_limited(UserId(2));

        clock.advance(Duration::from_secs(30));
        assert_eq!(limiter.sweep(), 1);
        assert_eq!(limiter.actor_count(), 1);
        assert_eq!(limiter.requests_in_window(UserId(1)), 0);
        assert_eq!(limiter.requests_in_window(UserId(2)), 1);
    }

    #[test]
    fn test_concurrent_checks_never_exceed_quota() {
        let clock = ManualClock::new();
        let limiter = Arc::new(RateLimiter::with_clock(
            Quota::new(10, Duration::from_secs(60)),
            clock,
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                std::thread::spawn(move || {
                    (0..5)
                        .filter(|_| !limiter.is_rate_limited(UserId(99)))
                        .count()
                })
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 10);
        assert_eq!(limiter.requests_in_window(UserId(99)), 10);
    }
}
