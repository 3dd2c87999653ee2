//! # Example: rate_limited
//!
//! Fetches a list of ids from a flaky, rate-limited backend.
//!
//! Demonstrates how to:
//! - Define a future-returning worker with [`WorkerFn::arc_future`].
//! - Pace items with a random delay and back off harder on "429" errors.
//! - Let later ids proceed while a failed one waits (`continue_parallel`).
//! - Watch lifecycle events from the [`Runner`] bus.
//!
//! ## Flow
//! ```text
//! Runner::run([1..=8])
//!     ├─► fetch(1)             (immediately)
//!     ├─► fetch(2)             (after 50..150ms)
//!     ├─► fetch(3) ─► 429      (retry after 400ms, fetch(4) continues)
//!     ├─► ...
//!     └─► settle ─► ["item-1", "item-2", ...]
//! ```
//!
//! Run with `RUST_LOG=debug cargo run --example rate_limited` to see the
//! scheduler's own trace output.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use serde_json::Value;
use tracing_subscriber::EnvFilter;

use sequencer::{
    CallError, Config, Delay, DelayContext, EventKind, RandomWait, Runner, WorkerFn, WorkerRef,
};

/// Simulated backend: every third request is throttled, id 7 is gone for good.
fn backend() -> WorkerRef<String> {
    let requests = Arc::new(AtomicU32::new(0));
    WorkerFn::arc_future("fetch", move |args: Vec<Value>| {
        let n = requests.fetch_add(1, Ordering::Relaxed) + 1;
        async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            let id = args[0].as_u64().ok_or_else(|| CallError::fail("bad id"))?;
            if id == 7 {
                return Err(CallError::fail("404 not found"));
            }
            if n % 3 == 0 {
                return Err(CallError::fail("429 too many requests"));
            }
            Ok(format!("item-{id}"))
        }
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cfg = Config {
        random_wait_time: RandomWait::millis(50, 150),
        retry_wait_time: Delay::dynamic(|ctx| match ctx {
            DelayContext::Retry { error, .. } if error.to_string().contains("429") => {
                Some(Duration::from_millis(400))
            }
            _ => Some(Duration::from_millis(100)),
        }),
        continue_parallel: true,
        max_retries: 2,
        logging_enabled: true,
        ..Config::default()
    };

    let runner = Runner::builder(backend()).with_config(cfg).build()?;

    let mut events = runner.subscribe();
    let watcher = tokio::spawn(async move {
        let mut retries = 0;
        while let Ok(ev) = events.recv().await {
            match ev.kind {
                EventKind::RetryScheduled => retries += 1,
                EventKind::RunSettled => {
                    println!(
                        "[events] settled with {} results after {retries} retries",
                        ev.results.unwrap_or(0)
                    );
                    break;
                }
                _ => {}
            }
        }
    });

    let items = runner.run(1..=8).await;
    watcher.await?;

    println!("[main] fetched: {items:?}");
    Ok(())
}
