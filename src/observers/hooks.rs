//! # Hook dispatch.
//!
//! [`Hooks`] holds the optional per-outcome callbacks of a runner together with
//! the fallback [`LogSink`]. Hooks receive `(worker, offset, params, result|error)`
//! where `params` is the item's original parameter value (not the normalized
//! argument list).

use std::sync::Arc;

use serde_json::Value;
use tracing::Level;

use crate::error::CallError;
use crate::observers::log::LogSink;

/// Called after a successful attempt.
pub type SuccessHook<R> = Arc<dyn Fn(&str, usize, &Value, &R) + Send + Sync>;

/// Called after a failed attempt (retry or final failure).
pub type ErrorHook = Arc<dyn Fn(&str, usize, &Value, &CallError) + Send + Sync>;

/// Per-outcome callbacks with a gated log-sink fallback.
pub(crate) struct Hooks<R> {
    pub(crate) success: Option<SuccessHook<R>>,
    pub(crate) retry: Option<ErrorHook>,
    pub(crate) failure: Option<ErrorHook>,
    pub(crate) sink: Arc<dyn LogSink>,
    pub(crate) logging_enabled: bool,
}

impl<R> Clone for Hooks<R> {
    fn clone(&self) -> Self {
        Self {
            success: self.success.clone(),
            retry: self.retry.clone(),
            failure: self.failure.clone(),
            sink: Arc::clone(&self.sink),
            logging_enabled: self.logging_enabled,
        }
    }
}

impl<R> Hooks<R> {
    /// Creates hooks with no callbacks, logging to `sink` when enabled.
    pub(crate) fn new(sink: Arc<dyn LogSink>, logging_enabled: bool) -> Self {
        Self {
            success: None,
            retry: None,
            failure: None,
            sink,
            logging_enabled,
        }
    }

    /// Reports a success.
    pub(crate) fn success(&self, worker: &str, offset: usize, params: &Value, result: &R) {
        match &self.success {
            Some(hook) => hook(worker, offset, params, result),
            None => self.write(Level::INFO, || {
                format!("{worker} succeeded for params: {params}, offset: {offset}")
            }),
        }
    }

    /// Reports a failure that will be retried.
    pub(crate) fn retry(&self, worker: &str, offset: usize, params: &Value, error: &CallError) {
        match &self.retry {
            Some(hook) => hook(worker, offset, params, error),
            None => self.write(Level::WARN, || {
                format!(
                    "{worker} failed, retrying for params: {params}, offset: {offset}, err: {error}"
                )
            }),
        }
    }

    /// Reports a failure with the retry budget exhausted.
    pub(crate) fn failure(&self, worker: &str, offset: usize, params: &Value, error: &CallError) {
        match &self.failure {
            Some(hook) => hook(worker, offset, params, error),
            None => self.write(Level::ERROR, || {
                format!("{worker} failed for params: {params}, offset: {offset}")
            }),
        }
    }

    fn write(&self, level: Level, message: impl FnOnce() -> String) {
        if self.logging_enabled {
            self.sink.log(level, &message());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Capture(Mutex<Vec<(Level, String)>>);

    impl LogSink for Capture {
        fn log(&self, level: Level, message: &str) {
            self.0.lock().unwrap().push((level, message.to_string()));
        }
    }

    fn capture(enabled: bool) -> (Arc<Capture>, Hooks<i64>) {
        let cap = Arc::new(Capture::default());
        let hooks = Hooks::new(Arc::clone(&cap) as Arc<dyn LogSink>, enabled);
        (cap, hooks)
    }

    #[test]
    fn test_default_messages() {
        let (cap, hooks) = capture(true);
        let err = CallError::fail("boom");
        hooks.success("fetch", 0, &json!(1), &1);
        hooks.retry("fetch", 4, &json!([5, "a"]), &err);
        hooks.failure("fetch", 4, &json!([5, "a"]), &err);

        let lines = cap.0.lock().unwrap();
        assert_eq!(
            *lines,
            vec![
                (
                    Level::INFO,
                    "fetch succeeded for params: 1, offset: 0".to_string()
                ),
                (
                    Level::WARN,
                    "fetch failed, retrying for params: [5,\"a\"], offset: 4, err: call failed: boom"
                        .to_string()
                ),
                (
                    Level::ERROR,
                    "fetch failed for params: [5,\"a\"], offset: 4".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_disabled_sink_is_silent() {
        let (cap, hooks) = capture(false);
        hooks.success("fetch", 0, &json!(1), &1);
        hooks.failure("fetch", 0, &json!(1), &CallError::fail("x"));
        assert!(cap.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_custom_hook_replaces_default() {
        let (cap, mut hooks) = capture(true);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        hooks.success = Some(Arc::new(move |w: &str, o: usize, p: &Value, r: &i64| {
            s.lock().unwrap().push((w.to_string(), o, p.clone(), *r));
        }));

        hooks.success("fetch", 2, &json!(3), &3);
        hooks.retry("fetch", 2, &json!(3), &CallError::fail("x"));

        assert_eq!(
            *seen.lock().unwrap(),
            vec![("fetch".to_string(), 2, json!(3), 3)]
        );
        // only the retry fell through to the sink
        assert_eq!(cap.0.lock().unwrap().len(), 1);
    }
}
