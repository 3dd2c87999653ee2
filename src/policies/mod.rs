//! Pacing policies.
//!
//! This module groups the knobs that control **how long** to wait before the next
//! item and before a retry.
//!
//! ## Contents
//! - [`Delay`]        delay specification (fixed / random range / function of context)
//! - [`RandomWait`]   random-range override (`false` / `true` / `[min, max]`)
//! - [`PacingPolicy`] resolves a [`Delay`] into a concrete [`Duration`](std::time::Duration)
//! - [`RandomSource`] replaceable randomness for range delays
//!
//! ## Quick wiring
//! ```text
//! Config { wait_time, retry_wait_time, random_wait_time, random_retry_wait_time }
//!      └─► Config::next_delay() / Config::retry_delay()   (random override applied)
//!           └─► PacingPolicy::{next_delay, retry_delay}
//!                └─► DelayedInvoker::schedule(step, delay)
//! ```
//!
//! ## Defaults
//! - next-item delay: fixed 100ms (also the fallback for a dynamic delay returning nothing).
//! - retry delay: fixed 2000ms (same fallback rule).
//! - `RandomWait::Default` range: `[100ms, 1000ms]`.

mod delay;
mod pacing;
mod random;

pub use delay::{Delay, DelayContext, DelayFn, RandomWait};
pub use pacing::{DEFAULT_RETRY_WAIT, DEFAULT_WAIT, PacingPolicy};
pub use random::{FixedRandom, RandomSource, ThreadRandom};
