use std::sync::Arc;

use serde_json::Value;

use crate::{
    core::{
        config::Config,
        runner::{Runner, Shared},
    },
    error::{CallError, ConfigError},
    events::Bus,
    observers::{ErrorHook, Hooks, LogSink, SuccessHook, TracingSink},
    policies::{PacingPolicy, RandomSource, ThreadRandom},
    workers::WorkerRef,
};

/// Builder for constructing a [`Runner`] with optional hooks.
pub struct RunnerBuilder<R> {
    worker: WorkerRef<R>,
    cfg: Config,
    success: Option<SuccessHook<R>>,
    retry: Option<ErrorHook>,
    failure: Option<ErrorHook>,
    sink: Arc<dyn LogSink>,
    random: Arc<dyn RandomSource>,
}

impl<R: Send + 'static> RunnerBuilder<R> {
    /// Creates a new builder with the default configuration.
    pub fn new(worker: WorkerRef<R>) -> Self {
        Self {
            worker,
            cfg: Config::default(),
            success: None,
            retry: None,
            failure: None,
            sink: Arc::new(TracingSink),
            random: Arc::new(ThreadRandom),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Called with `(worker, offset, params, result)` after each success,
    /// instead of the default log message.
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, usize, &Value, &R) + Send + Sync + 'static,
    {
        self.success = Some(Arc::new(f));
        self
    }

    /// Called with `(worker, offset, params, error)` after each failure that will
    /// be retried, instead of the default log message.
    pub fn on_retry<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, usize, &Value, &CallError) + Send + Sync + 'static,
    {
        self.retry = Some(Arc::new(f));
        self
    }

    /// Called with `(worker, offset, params, error)` when an item's retry budget
    /// is exhausted, instead of the default log message.
    pub fn on_failure<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, usize, &Value, &CallError) + Send + Sync + 'static,
    {
        self.failure = Some(Arc::new(f));
        self
    }

    /// Replaces the sink for default messages (still gated by `logging_enabled`).
    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replaces the randomness used by range delays.
    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    /// Validates the configuration and builds the runner.
    pub fn build(self) -> Result<Runner<R>, ConfigError> {
        self.cfg.validate()?;

        let pacing = PacingPolicy::new(self.cfg.next_delay(), self.cfg.retry_delay(), self.random);
        let hooks = Hooks {
            success: self.success,
            retry: self.retry,
            failure: self.failure,
            ..Hooks::new(self.sink, self.cfg.logging_enabled)
        };
        let bus = Bus::new(self.cfg.bus_capacity_clamped());

        Ok(Runner::from_shared(Shared {
            worker: self.worker,
            cfg: self.cfg,
            pacing,
            hooks,
            bus,
        }))
    }
}
