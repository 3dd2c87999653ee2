//! # Log sinks
//!
//! [`LogSink`] receives the default hook messages. [`TracingSink`] forwards them
//! to `tracing` under the `sequencer` target, so the application's subscriber
//! decides formatting and filtering.
//!
//! ## Example output (with `tracing_subscriber::fmt`)
//! ```text
//! INFO sequencer: fetch succeeded for params: 1, offset: 0
//! WARN sequencer: fetch failed, retrying for params: 5, offset: 4, err: call failed: 503
//! ERROR sequencer: fetch failed for params: 5, offset: 4
//! ```

use tracing::Level;

/// Destination for default hook messages.
pub trait LogSink: Send + Sync + 'static {
    /// Writes one message at `level`.
    fn log(&self, level: Level, message: &str);
}

/// Sink writing through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "sequencer", "{message}"),
            Level::WARN => tracing::warn!(target: "sequencer", "{message}"),
            Level::INFO => tracing::info!(target: "sequencer", "{message}"),
            Level::DEBUG => tracing::debug!(target: "sequencer", "{message}"),
            Level::TRACE => tracing::trace!(target: "sequencer", "{message}"),
        }
    }
}

impl<F> LogSink for F
where
    F: Fn(Level, &str) + Send + Sync + 'static,
{
    fn log(&self, level: Level, message: &str) {
        self(level, message)
    }
}
