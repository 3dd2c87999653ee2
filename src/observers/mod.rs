//! # Outcome hooks and the default log sink.
//!
//! Every attempt outcome is reported to exactly one hook:
//!
//! ```text
//! success            ──► Hooks::success  (on_success hook, else sink @ INFO)
//! failure, budget ok ──► Hooks::retry    (on_retry hook,   else sink @ WARN)
//! failure, exhausted ──► Hooks::failure  (on_failure hook, else sink @ ERROR)
//! ```
//!
//! A custom hook replaces the default message for its outcome only. The default
//! messages go to a single [`LogSink`], written only when `logging_enabled` is set.

mod hooks;
mod log;

pub(crate) use hooks::Hooks;
pub use hooks::{ErrorHook, SuccessHook};
pub use log::{LogSink, TracingSink};
