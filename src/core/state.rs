//! # Per-run bookkeeping.
//!
//! [`RunState`] owns everything one run mutates: slot states, per-offset attempt
//! counts, the fingerprint-keyed retry buckets, and the result sequence. It is
//! created by `Runner::run`, owned by that run alone, and dropped with it.
//!
//! ## Slot transitions
//! ```text
//!            begin()            fail() ≤ max
//! Pending ──────────► InFlight ─────────────► Retrying
//!                      │   ▲                     │
//!                      │   └─────── begin() ─────┘
//!                      ├── succeed() ──► Succeeded   (terminal)
//!                      └── fail() > max ──► Failed   (terminal)
//! ```
//!
//! ## Rules
//! - `begin` refuses terminal and in-flight slots, which makes stray steps no-ops.
//! - An offset is counted into `done` at most once.
//! - Retry buckets are keyed by [`fingerprint`], so equal items share a budget.
//! - `settle` hands out the results once; later calls return `None`.

use std::collections::HashMap;

use serde_json::Value;

use crate::params::fingerprint;

/// State of one offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Slot {
    Pending,
    InFlight,
    Retrying,
    Succeeded,
    Failed,
}

impl Slot {
    #[inline]
    fn is_terminal(self) -> bool {
        matches!(self, Slot::Succeeded | Slot::Failed)
    }
}

/// Decision after a failed attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Verdict {
    /// Budget left; the offset waits for a retry.
    Retry { failures: u32 },
    /// Budget exhausted; the offset is terminal.
    Exhausted { failures: u32 },
}

/// Mutable state of a single run.
pub(crate) struct RunState<R> {
    items: Vec<Value>,
    slots: Vec<Slot>,
    attempts: Vec<u32>,
    retries: HashMap<String, u32>,
    results: Vec<R>,
    done: usize,
    settled: bool,
}

impl<R> RunState<R> {
    pub(crate) fn new(items: Vec<Value>) -> Self {
        let n = items.len();
        Self {
            items,
            slots: vec![Slot::Pending; n],
            attempts: vec![0; n],
            retries: HashMap::new(),
            results: Vec::with_capacity(n),
            done: 0,
            settled: false,
        }
    }

    /// Number of items.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    /// Number of terminal offsets.
    #[inline]
    pub(crate) fn done(&self) -> usize {
        self.done
    }

    /// Parameter value at `offset`. Callers only pass offsets below `len()`.
    #[inline]
    pub(crate) fn params(&self, offset: usize) -> &Value {
        &self.items[offset]
    }

    /// Parameter value at `offset`, `None` past the end.
    #[inline]
    pub(crate) fn upcoming(&self, offset: usize) -> Option<&Value> {
        self.items.get(offset)
    }

    /// Attempts issued so far for `offset`.
    #[inline]
    pub(crate) fn attempt(&self, offset: usize) -> u32 {
        self.attempts.get(offset).copied().unwrap_or(0)
    }

    pub(crate) fn is_terminal(&self, offset: usize) -> bool {
        self.slots.get(offset).is_some_and(|s| s.is_terminal())
    }

    /// Moves `offset` to `InFlight` and returns its attempt number.
    ///
    /// Returns `None` (nothing to do) if the offset is out of range, terminal, or
    /// already in flight.
    pub(crate) fn begin(&mut self, offset: usize) -> Option<u32> {
        let slot = self.slots.get_mut(offset)?;
        if slot.is_terminal() || *slot == Slot::InFlight {
            return None;
        }
        *slot = Slot::InFlight;
        self.attempts[offset] += 1;
        Some(self.attempts[offset])
    }

    /// Records a success: appends the result and marks the offset terminal.
    pub(crate) fn succeed(&mut self, offset: usize, value: R) {
        self.results.push(value);
        self.mark(offset, Slot::Succeeded);
    }

    /// The most recently appended result.
    pub(crate) fn last_result(&self) -> Option<&R> {
        self.results.last()
    }

    /// Records a failure against the offset's fingerprint bucket.
    pub(crate) fn fail(&mut self, offset: usize, max_retries: u32) -> Verdict {
        let key = fingerprint(self.items.get(offset));
        let failures = self.retries.entry(key).or_insert(0);
        *failures += 1;
        let failures = *failures;

        if failures <= max_retries {
            if let Some(slot) = self.slots.get_mut(offset) {
                if !slot.is_terminal() {
                    *slot = Slot::Retrying;
                }
            }
            Verdict::Retry { failures }
        } else {
            self.mark(offset, Slot::Failed);
            Verdict::Exhausted { failures }
        }
    }

    /// First non-terminal offset after `offset`, or `len()` if none remains.
    pub(crate) fn next_open(&self, offset: usize) -> usize {
        (offset + 1..self.len())
            .find(|&o| !self.slots[o].is_terminal())
            .unwrap_or(self.len())
    }

    /// Hands out the results if every offset is terminal and the run has not
    /// settled yet.
    pub(crate) fn settle(&mut self) -> Option<Vec<R>> {
        if self.settled || self.done != self.len() {
            return None;
        }
        self.settled = true;
        Some(std::mem::take(&mut self.results))
    }

    /// Hands out whatever succeeded, regardless of outstanding offsets.
    pub(crate) fn force_settle(&mut self) -> Vec<R> {
        self.settled = true;
        std::mem::take(&mut self.results)
    }

    fn mark(&mut self, offset: usize, terminal: Slot) {
        if let Some(slot) = self.slots.get_mut(offset) {
            if !slot.is_terminal() {
                self.done += 1;
                *slot = terminal;
            }
        }
    }
}
