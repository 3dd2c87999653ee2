//! # Issue a single worker call.
//!
//! Wraps [`Worker::call`] so that a panic in either calling convention becomes a
//! [`CallError::Panicked`] instead of tearing down the run:
//!
//! ```text
//! Blocking:
//!   catch_unwind(worker.call(args)) → Ready(Ok | Err | Panicked)
//!
//! Future:
//!   catch_unwind(worker.call(args)) → Pending(fut)
//!   fut.catch_unwind()               → Ok | Err | Panicked   (when polled)
//! ```

use std::panic::{AssertUnwindSafe, catch_unwind};

use futures::FutureExt;
use serde_json::Value;

use crate::{
    error::CallError,
    workers::{Invocation, Worker},
};

/// Calls `worker` once with `args`, converting panics into call errors.
pub(crate) fn issue<R: Send + 'static>(
    worker: &dyn Worker<Output = R>,
    args: Vec<Value>,
) -> Invocation<R> {
    match catch_unwind(AssertUnwindSafe(|| worker.call(args))) {
        Ok(Invocation::Ready(res)) => Invocation::Ready(res),
        Ok(Invocation::Pending(fut)) => {
            let guarded = AssertUnwindSafe(fut).catch_unwind().map(|caught| match caught {
                Ok(res) => res,
                Err(panic) => Err(CallError::from_panic(panic)),
            });
            Invocation::Pending(Box::pin(guarded))
        }
        Err(panic) => Invocation::Ready(Err(CallError::from_panic(panic))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workers::WorkerFn;
    use serde_json::json;

    #[test]
    fn test_blocking_panic_becomes_error() {
        let w = WorkerFn::blocking("boom", |_args: Vec<Value>| -> Result<i32, CallError> {
            panic!("exploded")
        });
        match issue(&w, vec![json!(1)]) {
            Invocation::Ready(Err(CallError::Panicked { info })) => assert_eq!(info, "exploded"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_future_panic_becomes_error() {
        let w = WorkerFn::future("boom", |_args: Vec<Value>| async move {
            if true {
                panic!("later");
            }
            Ok::<i32, CallError>(1)
        });
        match issue(&w, vec![]) {
            Invocation::Pending(fut) => assert_eq!(
                fut.await,
                Err(CallError::Panicked {
                    info: "later".into()
                })
            ),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_future_success_passes_through() {
        let w = WorkerFn::future("ok", |args: Vec<Value>| async move {
            Ok::<_, CallError>(args.len())
        });
        match issue(&w, vec![json!(1), json!(2)]) {
            Invocation::Pending(fut) => assert_eq!(fut.await, Ok(2)),
            other => panic!("unexpected {other:?}"),
        }
    }
}
