//! # Run configuration.
//!
//! Provides [`Config`], the resolved options shared by every run of a
//! [`Runner`](crate::Runner).
//!
//! ## Sources
//! 1. **Code**: `Config { max_retries: 3, ..Config::default() }`
//! 2. **JSON**: `serde_json::from_str::<Config>(..)`; missing fields take defaults,
//!    and the camelCase option names (`waitTime`, `maxRetries`, ...) are accepted
//!    as aliases.
//!
//! ## Random overrides
//! `random_wait_time` / `random_retry_wait_time` take precedence over
//! `wait_time` / `retry_wait_time` when enabled; use [`Config::next_delay`] and
//! [`Config::retry_delay`] instead of reading the fields directly.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::policies::{DEFAULT_RETRY_WAIT, DEFAULT_WAIT, Delay, RandomWait};

/// Options for sequential runs.
///
/// ## Field semantics
/// - `wait_time`: delay before the next item (after success or final failure)
/// - `retry_wait_time`: delay before retrying a failed item
/// - `random_wait_time`, `random_retry_wait_time`: random-range overrides
/// - `continue_parallel`: start the next item while the current one retries
/// - `max_retries`: retries allowed per fingerprint (`0` = single attempt)
/// - `logging_enabled`: gate for the default log sink
/// - `bus_capacity`: event bus ring buffer size (min 1)
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Next-item delay specification.
    #[serde(alias = "waitTime")]
    pub wait_time: Delay,

    /// Retry delay specification.
    #[serde(alias = "retryWaitTime")]
    pub retry_wait_time: Delay,

    /// Random override for `wait_time`.
    #[serde(alias = "randomWaitTime")]
    pub random_wait_time: RandomWait,

    /// Random override for `retry_wait_time`.
    #[serde(alias = "randomRetryWaitTime")]
    pub random_retry_wait_time: RandomWait,

    /// Let the next item start while a failed item waits for its retry.
    ///
    /// Results are then appended in completion order, which may differ from
    /// input order.
    #[serde(alias = "continueParallel")]
    pub continue_parallel: bool,

    /// Retries per fingerprint; an item is attempted at most `max_retries + 1`
    /// times, fewer if an equal item already used part of the budget.
    #[serde(alias = "maxRetries")]
    pub max_retries: u32,

    /// Write default hook messages to the log sink.
    #[serde(alias = "loggingEnabled")]
    pub logging_enabled: bool,

    /// Capacity of the event bus broadcast channel.
    #[serde(alias = "busCapacity")]
    pub bus_capacity: usize,
}

impl Config {
    /// Effective next-item delay (random override applied).
    pub fn next_delay(&self) -> Delay {
        self.random_wait_time
            .as_delay()
            .unwrap_or_else(|| self.wait_time.clone())
    }

    /// Effective retry delay (random override applied).
    pub fn retry_delay(&self) -> Delay {
        self.random_retry_wait_time
            .as_delay()
            .unwrap_or_else(|| self.retry_wait_time.clone())
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Checks every range option.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.wait_time.validate("wait_time")?;
        self.retry_wait_time.validate("retry_wait_time")?;
        if let Some(d) = self.random_wait_time.as_delay() {
            d.validate("random_wait_time")?;
        }
        if let Some(d) = self.random_retry_wait_time.as_delay() {
            d.validate("random_retry_wait_time")?;
        }
        Ok(())
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `wait_time = 100ms`
    /// - `retry_wait_time = 2000ms`
    /// - random overrides off
    /// - `continue_parallel = false`
    /// - `max_retries = 5`
    /// - `logging_enabled = false`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            wait_time: Delay::Fixed(DEFAULT_WAIT),
            retry_wait_time: Delay::Fixed(DEFAULT_RETRY_WAIT),
            random_wait_time: RandomWait::Off,
            random_retry_wait_time: RandomWait::Off,
            continue_parallel: false,
            max_retries: 5,
            logging_enabled: false,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert!(matches!(cfg.next_delay(), Delay::Fixed(d) if d == Duration::from_millis(100)));
        assert!(matches!(cfg.retry_delay(), Delay::Fixed(d) if d == Duration::from_millis(2000)));
        assert_eq!(cfg.max_retries, 5);
        assert!(!cfg.continue_parallel);
        assert!(!cfg.logging_enabled);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_random_override_wins() {
        let cfg = Config {
            wait_time: Delay::millis(5),
            random_wait_time: RandomWait::Default,
            random_retry_wait_time: RandomWait::millis(1, 2),
            ..Config::default()
        };
        assert!(matches!(
            cfg.next_delay(),
            Delay::Range { min, max }
                if min == Duration::from_millis(100) && max == Duration::from_millis(1000)
        ));
        assert!(matches!(
            cfg.retry_delay(),
            Delay::Range { min, max }
                if min == Duration::from_millis(1) && max == Duration::from_millis(2)
        ));
    }

    #[test]
    fn test_from_json_with_aliases() {
        let cfg: Config = serde_json::from_str(
            r#"{
                "waitTime": 10,
                "retry_wait_time": [20, 40],
                "randomWaitTime": true,
                "continueParallel": true,
                "maxRetries": 3,
                "loggingEnabled": true
            }"#,
        )
        .unwrap();

        assert!(matches!(cfg.wait_time, Delay::Fixed(d) if d == Duration::from_millis(10)));
        assert!(matches!(cfg.retry_wait_time, Delay::Range { .. }));
        assert_eq!(cfg.random_wait_time, RandomWait::Default);
        assert_eq!(cfg.random_retry_wait_time, RandomWait::Off);
        assert!(cfg.continue_parallel);
        assert_eq!(cfg.max_retries, 3);
        assert!(cfg.logging_enabled);
        assert_eq!(cfg.bus_capacity, 1024);
    }

    #[test]
    fn test_validate_names_the_field() {
        let cfg = Config {
            random_retry_wait_time: RandomWait::millis(9, 3),
            ..Config::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidRange {
                field: "random_retry_wait_time",
                min: 9,
                max: 3
            })
        );
    }

    #[test]
    fn test_bus_capacity_clamped() {
        let cfg = Config {
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
