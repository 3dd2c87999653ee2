//! # Run: the single owner driving one item list.
//!
//! A [`Run`] owns its [`RunState`], its pacing timers ([`DelayedInvoker`]) and the
//! futures of in-flight calls. It waits for whichever becomes ready first and
//! applies the transition itself, so no state is shared and nothing is locked.
//!
//! ## Step for offset `o`
//! ```text
//! step(o)
//!   ├─ o ≥ len ──► done == len ? settle (once) : no-op
//!   ├─ terminal / in flight ──► no-op
//!   └─ issue(worker, normalize(item[o]))
//!         ├─ Ready(outcome)   ──► complete(o, outcome)       (blocking worker)
//!         └─ Pending(future)  ──► in-flight set ──► complete  (future worker)
//!
//! complete(o, Ok(r))  ──► append r, terminal, success hook, schedule advance
//! complete(o, Err(e)) ──► bucket[fingerprint(item[o])] += 1
//!     ├─ ≤ max_retries ──► retry hook, schedule o after retry delay
//!     │                    (+ schedule o+1 if continue_parallel and o+1 open)
//!     └─ > max_retries ──► failure hook, terminal, schedule advance
//!
//! advance(o) ──► schedule the first non-terminal offset after o (or len)
//!                after the next-item delay
//! ```
//!
//! ## Rules
//! - The first invocation is issued without delay.
//! - Settlement happens only through a step past the last offset.
//! - If nothing is pending and the run has not settled, it settles with the
//!   results it has and logs a warning.

use std::future::poll_fn;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    core::{
        attempt::issue,
        invoker::DelayedInvoker,
        runner::Shared,
        state::{RunState, Verdict},
    },
    error::CallError,
    events::{Event, EventKind},
    params::normalize,
    workers::Invocation,
};

/// Global run id counter.
static RUN_SEQ: AtomicU64 = AtomicU64::new(0);

type Outcome<R> = (usize, Result<R, CallError>);

/// What woke the run.
enum Wake<R> {
    /// A pacing timer fired for this offset.
    Due(usize),
    /// An in-flight call finished.
    Completed(Outcome<R>),
    /// Nothing is pending.
    Idle,
}

/// One run over an item list.
pub(crate) struct Run<R> {
    id: u64,
    worker: Arc<str>,
    shared: Arc<Shared<R>>,
    state: RunState<R>,
    timers: DelayedInvoker<usize>,
    inflight: FuturesUnordered<BoxFuture<'static, Outcome<R>>>,
}

impl<R: Send + 'static> Run<R> {
    pub(crate) fn new(shared: Arc<Shared<R>>, items: Vec<Value>) -> Self {
        Self {
            id: RUN_SEQ.fetch_add(1, Ordering::Relaxed),
            worker: Arc::from(shared.worker.name()),
            shared,
            state: RunState::new(items),
            timers: DelayedInvoker::new(),
            inflight: FuturesUnordered::new(),
        }
    }

    #[inline]
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.state.len()
    }

    /// Drives the run until it settles and returns the successful results in
    /// completion order.
    pub(crate) async fn drive(mut self) -> Vec<R> {
        if let Some(results) = self.step(0) {
            return results;
        }
        loop {
            let wake = poll_fn(|cx| self.poll_wake(cx)).await;
            match wake {
                Wake::Due(offset) => {
                    if let Some(results) = self.step(offset) {
                        return results;
                    }
                }
                Wake::Completed((offset, outcome)) => self.complete(offset, outcome),
                Wake::Idle => {
                    warn!(
                        run = self.id,
                        done = self.state.done(),
                        total = self.state.len(),
                        "nothing pending before every item finished; settling early"
                    );
                    let results = self.state.force_settle();
                    self.publish(self.event(EventKind::RunSettled).with_results(results.len()));
                    return results;
                }
            }
        }
    }

    fn poll_wake(&mut self, cx: &mut Context<'_>) -> Poll<Wake<R>> {
        if let Poll::Ready(Some(outcome)) = self.inflight.poll_next_unpin(cx) {
            return Poll::Ready(Wake::Completed(outcome));
        }
        if let Poll::Ready(Some(offset)) = self.timers.poll_due(cx) {
            return Poll::Ready(Wake::Due(offset));
        }
        if self.inflight.is_empty() && self.timers.is_empty() {
            return Poll::Ready(Wake::Idle);
        }
        Poll::Pending
    }

    /// Runs the step for `offset`; returns the results if this step settled the run.
    fn step(&mut self, offset: usize) -> Option<Vec<R>> {
        if offset >= self.state.len() {
            let results = self.state.settle()?;
            debug!(run = self.id, results = results.len(), "run settled");
            self.publish(self.event(EventKind::RunSettled).with_results(results.len()));
            return Some(results);
        }

        let attempt = self.state.begin(offset)?;
        debug!(run = self.id, offset, attempt, "calling worker");
        self.publish(
            self.event(EventKind::CallStarting)
                .with_offset(offset)
                .with_attempt(attempt),
        );

        let args = normalize(self.state.params(offset));
        match issue(self.shared.worker.as_ref(), args) {
            Invocation::Ready(outcome) => self.complete(offset, outcome),
            Invocation::Pending(fut) => self
                .inflight
                .push(fut.map(move |outcome| (offset, outcome)).boxed()),
        }
        None
    }

    fn complete(&mut self, offset: usize, outcome: Result<R, CallError>) {
        let attempt = self.state.attempt(offset);
        match outcome {
            Ok(value) => {
                self.state.succeed(offset, value);
                if let Some(result) = self.state.last_result() {
                    self.shared
                        .hooks
                        .success(&self.worker, offset, self.state.params(offset), result);
                }
                self.publish(
                    self.event(EventKind::CallSucceeded)
                        .with_offset(offset)
                        .with_attempt(attempt),
                );
                self.advance(offset);
            }
            Err(error) => {
                self.publish(
                    self.event(EventKind::CallFailed)
                        .with_offset(offset)
                        .with_attempt(attempt)
                        .with_reason(error.to_string()),
                );
                match self.state.fail(offset, self.shared.cfg.max_retries) {
                    Verdict::Retry { failures } => {
                        let params = self.state.params(offset);
                        self.shared.hooks.retry(&self.worker, offset, params, &error);
                        let delay = self.shared.pacing.retry_delay(&error, params);
                        self.timers.schedule(offset, delay);
                        debug!(
                            run = self.id,
                            offset,
                            failures,
                            ?delay,
                            timers = self.timers.len(),
                            "retry scheduled"
                        );
                        self.publish(
                            self.event(EventKind::RetryScheduled)
                                .with_offset(offset)
                                .with_attempt(attempt)
                                .with_delay(delay)
                                .with_reason(error.to_string()),
                        );

                        let next = offset + 1;
                        if self.shared.cfg.continue_parallel
                            && next < self.state.len()
                            && !self.state.is_terminal(next)
                        {
                            self.schedule_step(next);
                        }
                    }
                    Verdict::Exhausted { failures } => {
                        self.shared.hooks.failure(
                            &self.worker,
                            offset,
                            self.state.params(offset),
                            &error,
                        );
                        debug!(run = self.id, offset, failures, "retries exhausted");
                        self.publish(
                            self.event(EventKind::ItemExhausted)
                                .with_offset(offset)
                                .with_attempt(attempt)
                                .with_reason(error.to_string()),
                        );
                        self.advance(offset);
                    }
                }
            }
        }
    }

    /// Schedules the first non-terminal offset after `offset`.
    fn advance(&mut self, offset: usize) {
        let target = self.state.next_open(offset);
        self.schedule_step(target);
    }

    fn schedule_step(&mut self, target: usize) {
        let delay = self.shared.pacing.next_delay(self.state.upcoming(target));
        self.timers.schedule(target, delay);
        self.publish(
            self.event(EventKind::NextScheduled)
                .with_offset(target)
                .with_delay(delay),
        );
    }

    #[inline]
    fn event(&self, kind: EventKind) -> Event {
        Event::new(kind)
            .with_run(self.id)
            .with_worker(Arc::clone(&self.worker))
    }

    #[inline]
    fn publish(&self, ev: Event) {
        self.shared.bus.publish(ev);
    }
}
