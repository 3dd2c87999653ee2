//! # Runner: paced sequential invocation over an item list.
//!
//! A [`Runner`] binds a worker to a [`Config`] and hooks. Each call to
//! [`Runner::run`] starts an independent run with its own state; runs of the same
//! runner share only the configuration, the worker, the hooks and the event bus.
//!
//! ## Key responsibilities
//! - invoke the worker once per item, the first one immediately
//! - pace the next item by the next-item delay, retries by the retry delay
//! - bound retries per fingerprint with `max_retries`
//! - report outcomes to hooks and lifecycle events to the [`Bus`]
//! - return the successful results once every item is terminal
//!
//! ## Example
//! ```rust
//! use serde_json::Value;
//! use sequencer::{CallError, Config, Delay, Runner, WorkerFn};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let worker = WorkerFn::arc_future("square", |args: Vec<Value>| async move {
//!         let n = args[0].as_i64().ok_or_else(|| CallError::fail("not a number"))?;
//!         Ok::<_, CallError>(n * n)
//!     });
//!
//!     let runner = Runner::builder(worker)
//!         .with_config(Config {
//!             wait_time: Delay::millis(1),
//!             ..Config::default()
//!         })
//!         .build()?;
//!
//!     assert_eq!(runner.run([1, 2, 3]).await, vec![1, 4, 9]);
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::broadcast;
use tracing::Instrument;

use crate::{
    core::{builder::RunnerBuilder, config::Config, run::Run},
    error::ConfigError,
    events::{Bus, Event},
    observers::Hooks,
    policies::PacingPolicy,
    workers::WorkerRef,
};

/// Read-only context shared by every run of a runner.
pub(crate) struct Shared<R> {
    pub(crate) worker: WorkerRef<R>,
    pub(crate) cfg: Config,
    pub(crate) pacing: PacingPolicy,
    pub(crate) hooks: Hooks<R>,
    pub(crate) bus: Bus,
}

/// Drives a worker over item lists with pacing and bounded retries.
///
/// Cheap to clone; clones share configuration, hooks and the event bus.
pub struct Runner<R> {
    inner: Arc<Shared<R>>,
}

impl<R> Clone for Runner<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Send + 'static> std::fmt::Debug for Runner<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("worker", &self.inner.worker.name())
            .field("cfg", &self.inner.cfg)
            .finish()
    }
}

impl<R: Send + 'static> Runner<R> {
    /// Starts building a runner for `worker`.
    pub fn builder(worker: WorkerRef<R>) -> RunnerBuilder<R> {
        RunnerBuilder::new(worker)
    }

    /// Creates a runner with `cfg`, no custom hooks and the default log sink.
    pub fn new(worker: WorkerRef<R>, cfg: Config) -> Result<Self, ConfigError> {
        RunnerBuilder::new(worker).with_config(cfg).build()
    }

    pub(crate) fn from_shared(shared: Shared<R>) -> Self {
        Self {
            inner: Arc::new(shared),
        }
    }

    /// Invokes the worker over `items` and resolves to the successful results.
    ///
    /// The future always resolves: failed items are left out. Results are in
    /// completion order, which is input order unless `continue_parallel` lets
    /// items overlap. Dropping the future abandons the run with its timers and
    /// in-flight calls.
    pub async fn run<I, T>(&self, items: I) -> Vec<R>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let items: Vec<Value> = items.into_iter().map(Into::into).collect();
        let run = Run::new(Arc::clone(&self.inner), items);
        let span = tracing::debug_span!(
            "run",
            id = run.id(),
            worker = self.inner.worker.name(),
            mode = ?self.inner.worker.mode(),
            items = run.len()
        );
        run.drive().instrument(span).await
    }

    /// Creates a receiver for lifecycle events of all subsequent runs.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.inner.bus.subscribe()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.inner.cfg
    }

    /// Returns the worker's name.
    pub fn worker_name(&self) -> &str {
        self.inner.worker.name()
    }
}

/// Creates a runner for `worker` configured by `cfg`.
///
/// Shorthand for [`Runner::new`].
pub fn make_runner<R: Send + 'static>(
    worker: WorkerRef<R>,
    cfg: Config,
) -> Result<Runner<R>, ConfigError> {
    Runner::new(worker, cfg)
}
