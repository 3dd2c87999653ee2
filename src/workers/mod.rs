//! # Worker abstractions.
//!
//! This module provides the worker-related types:
//! - [`Worker`] - trait for the caller's function invoked once per item
//! - [`WorkerFn`] - closure-backed implementation (blocking or future-returning)
//! - [`WorkerRef`] - shared reference to a worker (`Arc<dyn Worker>`)
//! - [`Invocation`] - what one call produced: a ready outcome or a pending future

mod worker;
mod worker_fn;

pub use worker::{BoxCallFuture, CallMode, Invocation, Worker, WorkerRef};
pub use worker_fn::{Blocking, Deferred, WorkerFn};
