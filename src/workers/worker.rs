//! # Worker trait.
//!
//! A [`Worker`] has a stable [`name`](Worker::name) used in log messages and
//! receives each item's normalized argument list. It follows one of two calling
//! conventions, reported by [`Worker::mode`]:
//!
//! - [`CallMode::Blocking`]: the call returns its outcome directly
//!   ([`Invocation::Ready`]); it is handled in the same step that issued it.
//! - [`CallMode::Future`]: the call returns a future ([`Invocation::Pending`])
//!   that the run polls alongside its pacing timers.
//!
//! Panics raised by either convention are caught by the runner and reported as
//! [`CallError::Panicked`](crate::CallError::Panicked).

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use crate::error::CallError;

/// Boxed future returned by future-mode workers.
pub type BoxCallFuture<R> = Pin<Box<dyn Future<Output = Result<R, CallError>> + Send + 'static>>;

/// Shared handle to a worker producing `R`.
pub type WorkerRef<R> = Arc<dyn Worker<Output = R>>;

/// Calling convention of a worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallMode {
    /// Returns or fails synchronously.
    Blocking,
    /// Returns a future that resolves to the outcome.
    Future,
}

/// Result of issuing one call.
pub enum Invocation<R> {
    /// Outcome already known (blocking workers).
    Ready(Result<R, CallError>),
    /// Outcome arrives when the future resolves (future-mode workers).
    Pending(BoxCallFuture<R>),
}

impl<R> std::fmt::Debug for Invocation<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Invocation::Ready(res) => f
                .debug_tuple("Ready")
                .field(&res.as_ref().map(|_| "<value>"))
                .finish(),
            Invocation::Pending(_) => f.write_str("Pending(<future>)"),
        }
    }
}

/// # Caller-supplied function driven by the runner.
///
/// # Example
/// ```
/// use serde_json::Value;
/// use sequencer::{CallError, CallMode, Invocation, Worker};
///
/// struct Echo;
///
/// impl Worker for Echo {
///     type Output = Value;
///
///     fn name(&self) -> &str { "echo" }
///
///     fn mode(&self) -> CallMode { CallMode::Blocking }
///
///     fn call(&self, mut args: Vec<Value>) -> Invocation<Value> {
///         Invocation::Ready(args.pop().ok_or_else(|| CallError::fail("no args")))
///     }
/// }
/// ```
pub trait Worker: Send + Sync + 'static {
    /// Value produced by a successful call.
    type Output: Send + 'static;

    /// Returns a stable, human-readable worker name.
    fn name(&self) -> &str;

    /// Returns the calling convention.
    fn mode(&self) -> CallMode;

    /// Issues one call with the normalized argument list.
    fn call(&self, args: Vec<Value>) -> Invocation<Self::Output>;
}
