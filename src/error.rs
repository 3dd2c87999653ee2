//! Error types used by the sequencer runtime and workers.
//!
//! This module defines two error enums:
//!
//! - [`ConfigError`]: invalid run configuration, rejected when a runner is built.
//! - [`CallError`]: a failed worker invocation (reported error or caught panic).
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//! A [`CallError`] never aborts a run: it is retried until the retry budget of the
//! item's fingerprint is exhausted, then the item is dropped from the results.

use std::fmt::Display;

use thiserror::Error;

/// # Errors produced while building a runner.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A random delay range has its lower bound above its upper bound.
    #[error("invalid {field} range: min {min}ms exceeds max {max}ms")]
    InvalidRange {
        /// Name of the offending option.
        field: &'static str,
        /// Lower bound in milliseconds.
        min: u64,
        /// Upper bound in milliseconds.
        max: u64,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use sequencer::ConfigError;
    ///
    /// let err = ConfigError::InvalidRange { field: "wait_time", min: 10, max: 1 };
    /// assert_eq!(err.as_label(), "config_invalid_range");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::InvalidRange { .. } => "config_invalid_range",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ConfigError::InvalidRange { field, min, max } => {
                format!("{field}: [{min}, {max}] is not a valid range")
            }
        }
    }
}

/// # Errors produced by a worker invocation.
///
/// Every variant is treated as a transient failure until the retry budget for the
/// item's fingerprint runs out.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    /// The worker reported an error.
    #[error("call failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The worker panicked; the panic was caught and converted.
    #[error("call panicked: {info}")]
    Panicked {
        /// Panic payload, when it was a string.
        info: String,
    },
}

impl CallError {
    /// Builds a [`CallError::Fail`] from anything printable.
    ///
    /// # Example
    /// ```
    /// use sequencer::CallError;
    ///
    /// let err = CallError::fail("divisible by 5");
    /// assert_eq!(err.to_string(), "call failed: divisible by 5");
    /// ```
    pub fn fail(error: impl Display) -> Self {
        CallError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            CallError::Fail { .. } => "call_failed",
            CallError::Panicked { .. } => "call_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            CallError::Fail { error } => format!("error: {error}"),
            CallError::Panicked { info } => format!("panic: {info}"),
        }
    }

    /// Converts a caught panic payload into a [`CallError::Panicked`].
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let info = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        CallError::Panicked { info }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_payload_str() {
        let err = CallError::from_panic(Box::new("boom"));
        assert_eq!(
            err,
            CallError::Panicked {
                info: "boom".into()
            }
        );
        assert_eq!(err.as_label(), "call_panicked");
    }

    #[test]
    fn test_panic_payload_string() {
        let err = CallError::from_panic(Box::new(String::from("kaboom")));
        assert_eq!(err.as_message(), "panic: kaboom");
    }

    #[test]
    fn test_panic_payload_other() {
        let err = CallError::from_panic(Box::new(42_u8));
        assert_eq!(
            err,
            CallError::Panicked {
                info: "unknown panic payload".into()
            }
        );
    }

    #[test]
    fn test_fail_message() {
        let err = CallError::fail("nope");
        assert_eq!(err.as_label(), "call_failed");
        assert_eq!(err.as_message(), "error: nope");
    }
}
