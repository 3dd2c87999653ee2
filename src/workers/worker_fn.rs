//! # Function-backed worker (`WorkerFn`)
//!
//! [`WorkerFn`] wraps a closure `F: Fn(Vec<Value>) -> ...`. The second type
//! parameter selects the calling convention:
//!
//! - [`WorkerFn::blocking`] for `Fn(Vec<Value>) -> Result<R, CallError>`
//! - [`WorkerFn::future`] for `Fn(Vec<Value>) -> Fut` where `Fut` resolves to the result
//!
//! Each call creates a fresh future owning its own state; share state between
//! calls explicitly through `Arc<...>` captured by the closure.
//!
//! ## Example
//! ```rust
//! use serde_json::Value;
//! use sequencer::{CallError, WorkerFn, WorkerRef};
//!
//! let sum: WorkerRef<i64> = WorkerFn::arc_blocking("sum", |args: Vec<Value>| {
//!     Ok::<_, CallError>(args.iter().filter_map(Value::as_i64).sum::<i64>())
//! });
//!
//! let fetch: WorkerRef<String> = WorkerFn::arc_future("fetch", |args: Vec<Value>| async move {
//!     Ok::<_, CallError>(format!("GET /items/{}", args[0]))
//! });
//!
//! assert_eq!(sum.name(), "sum");
//! assert_eq!(fetch.name(), "fetch");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use crate::error::CallError;
use crate::workers::worker::{CallMode, Invocation, Worker};

/// Marker: the closure returns its outcome directly.
#[derive(Debug, Clone, Copy)]
pub struct Blocking;

/// Marker: the closure returns a future.
#[derive(Debug, Clone, Copy)]
pub struct Deferred;

/// Function-backed worker implementation.
pub struct WorkerFn<F, M> {
    name: Cow<'static, str>,
    f: F,
    _mode: PhantomData<fn() -> M>,
}

impl<F, M> std::fmt::Debug for WorkerFn<F, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerFn").field("name", &self.name).finish()
    }
}

impl<F> WorkerFn<F, Blocking> {
    /// Creates a blocking worker.
    pub fn blocking(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
            _mode: PhantomData,
        }
    }

    /// Creates a blocking worker as a shared handle.
    pub fn arc_blocking(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::blocking(name, f))
    }
}

impl<F> WorkerFn<F, Deferred> {
    /// Creates a future-returning worker.
    pub fn future(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
            _mode: PhantomData,
        }
    }

    /// Creates a future-returning worker as a shared handle.
    pub fn arc_future(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::future(name, f))
    }
}

impl<F, R> Worker for WorkerFn<F, Blocking>
where
    F: Fn(Vec<Value>) -> Result<R, CallError> + Send + Sync + 'static,
    R: Send + 'static,
{
    type Output = R;

    fn name(&self) -> &str {
        &self.name
    }

    fn mode(&self) -> CallMode {
        CallMode::Blocking
    }

    fn call(&self, args: Vec<Value>) -> Invocation<R> {
        Invocation::Ready((self.f)(args))
    }
}

impl<F, Fut, R> Worker for WorkerFn<F, Deferred>
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, CallError>> + Send + 'static,
    R: Send + 'static,
{
    type Output = R;

    fn name(&self) -> &str {
        &self.name
    }

    fn mode(&self) -> CallMode {
        CallMode::Future
    }

    fn call(&self, args: Vec<Value>) -> Invocation<R> {
        Invocation::Pending(Box::pin((self.f)(args)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blocking_is_ready() {
        let w = WorkerFn::blocking("last", |mut args: Vec<Value>| {
            args.pop().ok_or_else(|| CallError::fail("empty"))
        });
        assert_eq!(w.mode(), CallMode::Blocking);
        match w.call(vec![json!(1), json!(2)]) {
            Invocation::Ready(Ok(v)) => assert_eq!(v, json!(2)),
            other => panic!("unexpected {other:?}"),
        }
        match w.call(vec![]) {
            Invocation::Ready(Err(e)) => assert_eq!(e, CallError::fail("empty")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_future_is_pending() {
        let w = WorkerFn::future("double", |args: Vec<Value>| async move {
            args[0]
                .as_i64()
                .map(|n| n * 2)
                .ok_or_else(|| CallError::fail("not a number"))
        });
        assert_eq!(w.mode(), CallMode::Future);
        match w.call(vec![json!(21)]) {
            Invocation::Pending(fut) => assert_eq!(fut.await, Ok(42)),
            other => panic!("unexpected {other:?}"),
        }
    }
}
