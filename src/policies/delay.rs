//! # Delay specifications.
//!
//! [`Delay`] is the tagged form of a pacing option:
//! - [`Delay::Fixed`]: always the same duration;
//! - [`Delay::Range`]: uniform in `[min, max]`, rounded to whole milliseconds;
//! - [`Delay::Dynamic`]: computed from a [`DelayContext`] at scheduling time.
//!
//! [`RandomWait`] is the boolean-or-range override that, when enabled, replaces the
//! matching [`Delay`] with a [`Delay::Range`].
//!
//! Both deserialize from plain JSON values:
//! ```text
//! wait_time:        250          → Delay::Fixed(250ms)
//! wait_time:        [100, 900]   → Delay::Range { min: 100ms, max: 900ms }
//! random_wait_time: false        → RandomWait::Off
//! random_wait_time: true         → RandomWait::Default   ([100ms, 1000ms])
//! random_wait_time: [50, 75]     → RandomWait::Range { .. }
//! ```

use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{CallError, ConfigError};

/// Lower bound of the range used by [`RandomWait::Default`].
const DEFAULT_RANDOM_MIN: Duration = Duration::from_millis(100);
/// Upper bound of the range used by [`RandomWait::Default`].
const DEFAULT_RANDOM_MAX: Duration = Duration::from_millis(1000);

/// Input handed to a [`Delay::Dynamic`] function.
#[derive(Debug, Clone, Copy)]
pub enum DelayContext<'a> {
    /// Pacing before the next offset; `upcoming` is `None` past the last item.
    Next {
        /// Parameter value of the item about to be invoked.
        upcoming: Option<&'a Value>,
    },
    /// Pacing before retrying a failed offset.
    Retry {
        /// Error of the failed attempt.
        error: &'a CallError,
        /// Parameter value of the failed item.
        params: &'a Value,
    },
}

/// Function form of a delay. Returning `None` or zero selects the slot default.
pub type DelayFn = Arc<dyn Fn(&DelayContext<'_>) -> Option<Duration> + Send + Sync>;

/// Delay specification.
#[derive(Clone)]
pub enum Delay {
    /// Constant delay.
    Fixed(Duration),
    /// Uniformly random delay in `[min, max]`.
    Range {
        /// Inclusive lower bound.
        min: Duration,
        /// Inclusive upper bound.
        max: Duration,
    },
    /// Delay computed from the scheduling context.
    Dynamic(DelayFn),
}

impl Delay {
    /// Fixed delay in milliseconds.
    pub fn millis(ms: u64) -> Self {
        Delay::Fixed(Duration::from_millis(ms))
    }

    /// Random range in milliseconds.
    pub fn range_millis(min: u64, max: u64) -> Self {
        Delay::Range {
            min: Duration::from_millis(min),
            max: Duration::from_millis(max),
        }
    }

    /// Delay computed by `f`.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use sequencer::{Delay, DelayContext};
    ///
    /// // Back off harder on rate-limit errors.
    /// let retry = Delay::dynamic(|ctx| match ctx {
    ///     DelayContext::Retry { error, .. } if error.to_string().contains("429") => {
    ///         Some(Duration::from_secs(30))
    ///     }
    ///     _ => None,
    /// });
    /// # let _ = retry;
    /// ```
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&DelayContext<'_>) -> Option<Duration> + Send + Sync + 'static,
    {
        Delay::Dynamic(Arc::new(f))
    }

    /// Checks range bounds; `field` names the option in the error.
    pub(crate) fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        match self {
            Delay::Range { min, max } if min > max => Err(ConfigError::InvalidRange {
                field,
                min: min.as_millis() as u64,
                max: max.as_millis() as u64,
            }),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Debug for Delay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Delay::Fixed(d) => f.debug_tuple("Fixed").field(d).finish(),
            Delay::Range { min, max } => f
                .debug_struct("Range")
                .field("min", min)
                .field("max", max)
                .finish(),
            Delay::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DelayRepr {
    Millis(u64),
    Range(u64, u64),
}

impl<'de> Deserialize<'de> for Delay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match DelayRepr::deserialize(deserializer)? {
            DelayRepr::Millis(ms) => Delay::millis(ms),
            DelayRepr::Range(min, max) => Delay::range_millis(min, max),
        })
    }
}

/// Random-range override for a delay slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RandomWait {
    /// Use the configured [`Delay`] as is.
    #[default]
    Off,
    /// Random in `[100ms, 1000ms]`.
    Default,
    /// Random in `[min, max]`.
    Range {
        /// Inclusive lower bound.
        min: Duration,
        /// Inclusive upper bound.
        max: Duration,
    },
}

impl RandomWait {
    /// Random range in milliseconds.
    pub fn millis(min: u64, max: u64) -> Self {
        RandomWait::Range {
            min: Duration::from_millis(min),
            max: Duration::from_millis(max),
        }
    }

    /// Returns the range delay this override stands for, if enabled.
    pub fn as_delay(&self) -> Option<Delay> {
        match *self {
            RandomWait::Off => None,
            RandomWait::Default => Some(Delay::Range {
                min: DEFAULT_RANDOM_MIN,
                max: DEFAULT_RANDOM_MAX,
            }),
            RandomWait::Range { min, max } => Some(Delay::Range { min, max }),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RandomWaitRepr {
    Flag(bool),
    Range(u64, u64),
}

impl<'de> Deserialize<'de> for RandomWait {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RandomWaitRepr::deserialize(deserializer)? {
            RandomWaitRepr::Flag(false) => RandomWait::Off,
            RandomWaitRepr::Flag(true) => RandomWait::Default,
            RandomWaitRepr::Range(min, max) => RandomWait::millis(min, max),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_from_json() {
        let d: Delay = serde_json::from_str("250").unwrap();
        assert!(matches!(d, Delay::Fixed(x) if x == Duration::from_millis(250)));

        let d: Delay = serde_json::from_str("[100, 900]").unwrap();
        assert!(matches!(
            d,
            Delay::Range { min, max }
                if min == Duration::from_millis(100) && max == Duration::from_millis(900)
        ));

        assert!(serde_json::from_str::<Delay>("\"soon\"").is_err());
    }

    #[test]
    fn test_random_wait_from_json() {
        assert_eq!(
            serde_json::from_str::<RandomWait>("false").unwrap(),
            RandomWait::Off
        );
        assert_eq!(
            serde_json::from_str::<RandomWait>("true").unwrap(),
            RandomWait::Default
        );
        assert_eq!(
            serde_json::from_str::<RandomWait>("[50, 75]").unwrap(),
            RandomWait::millis(50, 75)
        );
    }

    #[test]
    fn test_random_wait_as_delay() {
        assert!(RandomWait::Off.as_delay().is_none());
        assert!(matches!(
            RandomWait::Default.as_delay(),
            Some(Delay::Range { min, max })
                if min == Duration::from_millis(100) && max == Duration::from_millis(1000)
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        assert_eq!(
            Delay::range_millis(10, 1).validate("wait_time"),
            Err(ConfigError::InvalidRange {
                field: "wait_time",
                min: 10,
                max: 1
            })
        );
        assert!(Delay::range_millis(1, 1).validate("wait_time").is_ok());
        assert!(Delay::millis(0).validate("wait_time").is_ok());
    }
}
