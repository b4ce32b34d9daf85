//! Per-actor sliding window of admitted request timestamps.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Limits applied to every actor's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    /// Maximum admitted requests inside the window
    pub max_requests: usize,
    /// Length of the trailing window
    pub window: Duration,
}

impl Quota {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }
}

impl Default for Quota {
    fn default() -> Self {
        Self::new(10, Duration::from_secs(60))
    }
}

/// Admitted request timestamps for one actor, oldest first.
///
/// Only admitted requests are recorded. A rejected attempt leaves the window
/// untouched, so quota recovers as soon as the oldest admitted entry ages out.
#[derive(Debug, Default)]
pub struct SlidingWindow {
    hits: VecDeque<Instant>,
}

impl SlidingWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry that has fallen out of the trailing window.
    pub fn prune(&mut self, now: Instant, window: Duration) {
        while let Some(&oldest) = self.hits.front() {
            if now.saturating_duration_since(oldest) >= window {
                self.hits.pop_front();
            } else {
                break;
            }
        }
    }

    /// Prune, then admit the request if the remaining count is under quota.
    ///
    /// Returns `true` when the request was admitted and recorded.
    pub fn try_admit(&mut self, now: Instant, quota: Quota) -> bool {
        self.prune(now, quota.window);

        if self.hits.len() >= quota.max_requests {
            return false;
        }

        self.hits.push_back(now);
        true
    }

    /// Number of admitted requests currently held.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Time until the oldest entry leaves the window, if any.
    pub fn retry_after(&self, now: Instant, window: Duration) -> Option<Duration> {
        self.hits
            .front()
            .map(|&oldest| window.saturating_sub(now.saturating_duration_since(oldest)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(60);

    #[test]
    fn test_admits_up_to_quota() {
        let now = Instant::now();
        let quota = Quota::new(3, WINDOW);
        let mut window = SlidingWindow::new();

        assert!(window.try_admit(now, quota));
        assert!(window.try_admit(now, quota));
        assert!(window.try_admit(now, quota));
        assert!(!window.try_admit(now, quota));
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn test_rejected_attempt_is_not_recorded() {
        let now = Instant::now();
        let quota = Quota::new(1, WINDOW);
        let mut window = SlidingWindow::new();

        assert!(window.try_admit(now, quota));
        for i in 1..10 {
            assert!(!window.try_admit(now + Duration::from_secs(i), quota));
        }
        assert_eq!(window.len(), 1);

        // Only the first admitted hit matters for recovery.
        assert!(window.try_admit(now + WINDOW, quota));
    }

    #[test]
    fn test_prune_is_inclusive_at_window_edge() {
        let start = Instant::now();
        let mut window = SlidingWindow::new();
        window.try_admit(start, Quota::new(5, WINDOW));
        window.try_admit(start + Duration::from_secs(30), Quota::new(5, WINDOW));

        window.prune(start + Duration::from_secs(59), WINDOW);
        assert_eq!(window.len(), 2);

        window.prune(start + WINDOW, WINDOW);
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_retry_after_counts_down_from_oldest() {
        let start = Instant::now();
        let mut window = SlidingWindow::new();
        assert_eq!(window.retry_after(start, WINDOW), None);

        window.try_admit(start, Quota::new(5, WINDOW));
        assert_eq!(
            window.retry_after(start + Duration::from_secs(20), WINDOW),
            Some(Duration::from_secs(40))
        );
    }
}
