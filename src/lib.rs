//! # sequencer
//!
//! **Sequencer** invokes a worker once per item of an ordered list, pacing the
//! invocations and retrying failures with a bounded budget.
//!
//! It is meant for talking to rate-limited or flaky backends: a fixed or random
//! delay separates consecutive items, a failed item is retried after its own
//! delay, and items that keep failing are dropped from the results instead of
//! aborting the run.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   items: [p0, p1, p2, ...]          Config (delays, retries, flags)
//!            │                                   │
//!            ▼                                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Runner (shared by all runs)                                      │
//! │  - WorkerRef (blocking or future-returning worker)                │
//! │  - PacingPolicy (fixed / random range / dynamic delays)           │
//! │  - Hooks (success / retry / failure, LogSink fallback)            │
//! │  - Bus (broadcast events)                                         │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        │ Runner::run(items)
//!        ▼
//!     ┌─────────────────────────────────────────┐
//!     │  Run (single owner, one per call)       │
//!     │  - RunState (slots, retry buckets,      │
//!     │    results)                             │
//!     │  - DelayedInvoker (pacing timers)       │
//!     │  - in-flight worker futures             │
//!     └┬────────────────────────────────────────┘
//!      │ Publishes events:
//!      │ - CallStarting / CallSucceeded / CallFailed
//!      │ - RetryScheduled / NextScheduled
//!      │ - ItemExhausted / RunSettled
//!      ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │                  (capacity: Config::bus_capacity)                 │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Lifecycle of one item
//! ```text
//! step(o) ──► worker(normalize(items[o]))
//!     ├─ Ok(r)  ──► results.push(r), success hook
//!     │             └─ after wait_time ──► step(next open offset)
//!     └─ Err(e) ──► bucket[fingerprint(items[o])] += 1
//!                   ├─ within max_retries ──► retry hook
//!                   │     ├─ after retry_wait_time ──► step(o)
//!                   │     └─ continue_parallel ──► also step(o + 1)
//!                   └─ exhausted ──► failure hook
//!                         └─ after wait_time ──► step(next open offset)
//!
//! step(len) with every item finished ──► settle: resolve with results
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                       |
//! |-------------------|---------------------------------------------------------------|------------------------------------------|
//! | **Runner**        | Paced sequential invocation with bounded retries.             | [`Runner`], [`RunnerBuilder`]            |
//! | **Workers**       | Blocking or future-returning workers from closures.           | [`Worker`], [`WorkerFn`], [`WorkerRef`]  |
//! | **Pacing**        | Fixed, random-range and context-dependent delays.             | [`Delay`], [`RandomWait`], [`PacingPolicy`] |
//! | **Hooks**         | Per-outcome callbacks with a gated default log sink.          | [`RunnerBuilder::on_success`], [`LogSink`] |
//! | **Events**        | Broadcast lifecycle events for monitoring and tests.          | [`Event`], [`EventKind`], [`Bus`]        |
//! | **Errors**        | Typed errors for configuration and worker calls.              | [`ConfigError`], [`CallError`]           |
//! | **Configuration** | Options with defaults and serde support.                      | [`Config`]                               |
//!
//! ## Example
//! ```rust
//! use serde_json::Value;
//! use sequencer::{CallError, Config, Delay, Runner, WorkerFn, WorkerRef};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Multiples of 5 always fail and are left out of the results.
//!     let worker: WorkerRef<i64> = WorkerFn::arc_blocking("skip_fives", |args: Vec<Value>| {
//!         let n = args[0].as_i64().ok_or_else(|| CallError::fail("not a number"))?;
//!         if n % 5 == 0 {
//!             return Err(CallError::fail(format!("{n} is divisible by 5")));
//!         }
//!         Ok(n)
//!     });
//!
//!     let cfg = Config {
//!         wait_time: Delay::millis(1),
//!         retry_wait_time: Delay::millis(1),
//!         max_retries: 2,
//!         ..Config::default()
//!     };
//!
//!     let runner = Runner::builder(worker)
//!         .with_config(cfg)
//!         .on_failure(|worker, offset, params, err| {
//!             eprintln!("{worker} gave up on {params} at {offset}: {err}");
//!         })
//!         .build()?;
//!
//!     let out = runner.run(1..=6).await;
//!     assert_eq!(out, vec![1, 2, 3, 4, 6]);
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod observers;
pub mod params;
mod policies;
mod workers;

// ---- Public re-exports ----

pub use core::{Config, Runner, RunnerBuilder, make_runner};
pub use error::{CallError, ConfigError};
pub use events::{Bus, Event, EventKind};
pub use observers::{ErrorHook, LogSink, SuccessHook, TracingSink};
pub use policies::{
    DEFAULT_RETRY_WAIT, DEFAULT_WAIT, Delay, DelayContext, DelayFn, FixedRandom, PacingPolicy,
    RandomSource, RandomWait, ThreadRandom,
};
pub use workers::{
    Blocking, BoxCallFuture, CallMode, Deferred, Invocation, Worker, WorkerFn, WorkerRef,
};
