//! # Delayed invocation of run steps.
//!
//! [`DelayedInvoker`] holds every outstanding pacing timer of one run. Scheduling
//! never blocks and cannot be cancelled; each call adds an independent timer, so
//! the same offset may be scheduled more than once (the step itself is idempotent).
//!
//! ```text
//! schedule(step, 100ms) ──┐
//! schedule(step, 2s)    ──┼──► DelayQueue ──► poll_due() ──► step ready to run
//! schedule(step, 0ms)   ──┘
//! ```
//!
//! Timers are owned by the run; dropping the run drops them.

use std::task::{Context, Poll};
use std::time::Duration;

use tokio_util::time::DelayQueue;

/// Queue of actions that become due after a delay.
pub(crate) struct DelayedInvoker<T> {
    queue: DelayQueue<T>,
}

impl<T> DelayedInvoker<T> {
    /// Creates an empty invoker.
    pub(crate) fn new() -> Self {
        Self {
            queue: DelayQueue::new(),
        }
    }

    /// Makes `action` due after `delay`.
    pub(crate) fn schedule(&mut self, action: T, delay: Duration) {
        self.queue.insert(action, delay);
    }

    /// Polls for the next due action.
    ///
    /// Returns `Ready(None)` when nothing is scheduled.
    pub(crate) fn poll_due(&mut self, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.queue
            .poll_expired(cx)
            .map(|expired| expired.map(|e| e.into_inner()))
    }

    /// Number of outstanding timers.
    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    /// True if no timer is outstanding.
    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::poll_fn;
    use tokio::time::Instant;

    async fn next_due<T>(inv: &mut DelayedInvoker<T>) -> Option<T> {
        poll_fn(|cx| inv.poll_due(cx)).await
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let mut inv = DelayedInvoker::new();
        let start = Instant::now();
        inv.schedule("a", Duration::from_millis(100));

        assert_eq!(next_due(&mut inv).await, Some("a"));
        assert!(start.elapsed() >= Duration::from_millis(100));
        assert!(inv.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_independent_timers_fire_in_deadline_order() {
        let mut inv = DelayedInvoker::new();
        inv.schedule(3, Duration::from_millis(300));
        inv.schedule(1, Duration::from_millis(100));
        inv.schedule(2, Duration::from_millis(200));
        assert_eq!(inv.len(), 3);

        assert_eq!(next_due(&mut inv).await, Some(1));
        assert_eq!(next_due(&mut inv).await, Some(2));
        assert_eq!(next_due(&mut inv).await, Some(3));
        assert_eq!(next_due(&mut inv).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay_is_due_immediately() {
        let mut inv = DelayedInvoker::new();
        let start = Instant::now();
        inv.schedule(7_usize, Duration::ZERO);
        assert_eq!(next_due(&mut inv).await, Some(7));
        assert!(start.elapsed() <= Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_action_twice() {
        let mut inv = DelayedInvoker::new();
        inv.schedule(0_usize, Duration::from_millis(10));
        inv.schedule(0_usize, Duration::from_millis(10));
        assert_eq!(next_due(&mut inv).await, Some(0));
        assert_eq!(next_due(&mut inv).await, Some(0));
    }
}
