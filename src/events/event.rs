//! # Run events emitted while driving items.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Attempt events**: one worker call (starting, succeeded, failed)
//! - **Scheduling events**: a pacing delay was chosen (retry or next item)
//! - **Terminal events**: an item exhausted its budget, or the run settled
//!
//! The [`Event`] struct carries additional metadata such as timestamps, run id,
//! offset, attempt number, delays and failure reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use sequencer::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::RetryScheduled)
//!     .with_worker("fetch")
//!     .with_offset(4)
//!     .with_attempt(2)
//!     .with_delay(Duration::from_millis(2000))
//!     .with_reason("timeout");
//!
//! assert_eq!(ev.kind, EventKind::RetryScheduled);
//! assert_eq!(ev.offset, Some(4));
//! assert_eq!(ev.delay_ms, Some(2000));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of run events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Attempt events ===
    /// Worker is being called for an offset.
    ///
    /// Sets: `run`, `worker`, `offset`, `attempt` (1-based, per offset)
    CallStarting,

    /// Call succeeded; the result was appended.
    ///
    /// Sets: `run`, `worker`, `offset`, `attempt`
    CallSucceeded,

    /// Call failed (before the retry decision).
    ///
    /// Sets: `run`, `worker`, `offset`, `attempt`, `reason`
    CallFailed,

    // === Scheduling events ===
    /// Retry of a failed offset scheduled.
    ///
    /// Sets: `run`, `worker`, `offset`, `attempt` (failed attempt), `delay_ms`, `reason`
    RetryScheduled,

    /// Next offset scheduled. `offset` is the target; it equals the item count
    /// for the settling step after the last item.
    ///
    /// Sets: `run`, `worker`, `offset`, `delay_ms`
    NextScheduled,

    // === Terminal events ===
    /// Offset failed with its retry budget exhausted; no result recorded.
    ///
    /// Sets: `run`, `worker`, `offset`, `attempt`, `reason`
    ItemExhausted,

    /// Run settled with its result sequence.
    ///
    /// Sets: `run`, `worker`, `results` (number of successful items)
    RunSettled,
}

/// Run event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Run identifier, unique per `Runner::run` call.
    pub run: Option<u64>,
    /// Worker name.
    pub worker: Option<Arc<str>>,
    /// Item offset (0-based).
    pub offset: Option<usize>,
    /// Attempt count for the offset (starting from 1).
    pub attempt: Option<u32>,
    /// Scheduled delay in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Human-readable reason (failure message).
    pub reason: Option<Arc<str>>,
    /// Number of results at settlement.
    pub results: Option<usize>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            run: None,
            worker: None,
            offset: None,
            attempt: None,
            delay_ms: None,
            reason: None,
            results: None,
        }
    }

    /// Attaches a run id.
    #[inline]
    pub fn with_run(mut self, run: u64) -> Self {
        self.run = Some(run);
        self
    }

    /// Attaches a worker name.
    #[inline]
    pub fn with_worker(mut self, worker: impl Into<Arc<str>>) -> Self {
        self.worker = Some(worker.into());
        self
    }

    /// Attaches an item offset.
    #[inline]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the settled result count.
    #[inline]
    pub fn with_results(mut self, n: usize) -> Self {
        self.results = Some(n);
        self
    }

    /// Returns `true` for events that end an item or the run.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            EventKind::CallSucceeded | EventKind::ItemExhausted | EventKind::RunSettled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::CallStarting);
        let b = Event::new(EventKind::CallStarting);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_delay_saturates() {
        let ev = Event::new(EventKind::NextScheduled).with_delay(Duration::from_secs(u64::MAX));
        assert_eq!(ev.delay_ms, Some(u32::MAX));
    }

    #[test]
    fn test_terminal_kinds() {
        assert!(Event::new(EventKind::ItemExhausted).is_terminal());
        assert!(Event::new(EventKind::RunSettled).is_terminal());
        assert!(!Event::new(EventKind::RetryScheduled).is_terminal());
    }
}
