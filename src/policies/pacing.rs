//! # Pacing policy.
//!
//! [`PacingPolicy`] turns the two configured delay slots into concrete durations:
//! - **next**: waited after an item reaches a terminal state, before the next one;
//! - **retry**: waited after a failed attempt, before the same item is retried.
//!
//! Range delays are computed as `min + round(r × (max − min))` milliseconds with
//! `r` drawn from the policy's [`RandomSource`], so `r = 0` gives `min` and
//! `r = 1` gives `max`.
//!
//! # Example
//! ```rust
//! use std::{sync::Arc, time::Duration};
//! use sequencer::{Delay, FixedRandom, PacingPolicy};
//!
//! let pacing = PacingPolicy::new(
//!     Delay::range_millis(100, 500),
//!     Delay::millis(2000),
//!     Arc::new(FixedRandom(0.5)),
//! );
//!
//! assert_eq!(pacing.next_delay(None), Duration::from_millis(300));
//! ```

use std::{sync::Arc, time::Duration};

use serde_json::Value;

use crate::error::CallError;
use crate::policies::delay::{Delay, DelayContext};
use crate::policies::random::RandomSource;

/// Default next-item delay, and fallback for dynamic next delays.
pub const DEFAULT_WAIT: Duration = Duration::from_millis(100);
/// Default retry delay, and fallback for dynamic retry delays.
pub const DEFAULT_RETRY_WAIT: Duration = Duration::from_millis(2000);

/// Resolves delay specifications into durations.
#[derive(Clone)]
pub struct PacingPolicy {
    next: Delay,
    retry: Delay,
    random: Arc<dyn RandomSource>,
}

impl std::fmt::Debug for PacingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacingPolicy")
            .field("next", &self.next)
            .field("retry", &self.retry)
            .field("random", &"<source>")
            .finish()
    }
}

impl PacingPolicy {
    /// Creates a policy from the already-resolved next/retry specifications.
    pub fn new(next: Delay, retry: Delay, random: Arc<dyn RandomSource>) -> Self {
        Self {
            next,
            retry,
            random,
        }
    }

    /// Delay before invoking the item holding `upcoming` (`None` past the end).
    pub fn next_delay(&self, upcoming: Option<&Value>) -> Duration {
        self.resolve(&self.next, &DelayContext::Next { upcoming }, DEFAULT_WAIT)
    }

    /// Delay before retrying `params` after `error`.
    pub fn retry_delay(&self, error: &CallError, params: &Value) -> Duration {
        self.resolve(
            &self.retry,
            &DelayContext::Retry { error, params },
            DEFAULT_RETRY_WAIT,
        )
    }

    /// Resolves one specification.
    ///
    /// `fallback` is used when a dynamic delay returns `None` or zero.
    pub fn resolve(&self, delay: &Delay, ctx: &DelayContext<'_>, fallback: Duration) -> Duration {
        match delay {
            Delay::Fixed(d) => *d,
            Delay::Range { min, max } => self.random_in(*min, *max),
            Delay::Dynamic(f) => f(ctx).filter(|d| !d.is_zero()).unwrap_or(fallback),
        }
    }

    /// Uniform pick in `[min, max]` at millisecond granularity.
    fn random_in(&self, min: Duration, max: Duration) -> Duration {
        let min_ms = min.as_millis() as u64;
        let max_ms = max.as_millis() as u64;
        if max_ms <= min_ms {
            return Duration::from_millis(min_ms);
        }
        let span = (max_ms - min_ms) as f64;
        let offset = (self.random.sample() * span).round() as u64;
        Duration::from_millis(min_ms + offset.min(max_ms - min_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::random::{FixedRandom, ThreadRandom};
    use serde_json::json;

    fn with_random(next: Delay, r: f64) -> PacingPolicy {
        PacingPolicy::new(next, Delay::millis(2000), Arc::new(FixedRandom(r)))
    }

    #[test]
    fn test_fixed_returns_value() {
        let p = with_random(Delay::millis(250), 0.9);
        assert_eq!(p.next_delay(Some(&json!(1))), Duration::from_millis(250));
        assert_eq!(
            p.retry_delay(&CallError::fail("x"), &json!(1)),
            Duration::from_millis(2000)
        );
    }

    #[test]
    fn test_range_min_at_zero() {
        let p = with_random(Delay::range_millis(100, 500), 0.0);
        assert_eq!(p.next_delay(None), Duration::from_millis(100));
    }

    #[test]
    fn test_range_max_at_one() {
        let p = with_random(Delay::range_millis(100, 500), 1.0);
        assert_eq!(p.next_delay(None), Duration::from_millis(500));
    }

    #[test]
    fn test_range_midpoint() {
        let p = with_random(Delay::range_millis(100, 500), 0.5);
        assert_eq!(p.next_delay(None), Duration::from_millis(300));
    }

    #[test]
    fn test_range_rounds_to_nearest_ms() {
        // 0.3337 × 3 = 1.0011 → 1
        let p = with_random(Delay::range_millis(0, 3), 0.3337);
        assert_eq!(p.next_delay(None), Duration::from_millis(1));
        // 0.5 × 3 = 1.5 → 2
        let p = with_random(Delay::range_millis(0, 3), 0.5);
        assert_eq!(p.next_delay(None), Duration::from_millis(2));
    }

    #[test]
    fn test_range_bounds_with_thread_random() {
        let p = PacingPolicy::new(
            Delay::range_millis(100, 1000),
            Delay::millis(0),
            Arc::new(ThreadRandom),
        );
        for _ in 0..500 {
            let d = p.next_delay(None);
            assert!(d >= Duration::from_millis(100) && d <= Duration::from_millis(1000));
        }
    }

    #[test]
    fn test_dynamic_sees_upcoming_item() {
        let p = with_random(
            Delay::dynamic(|ctx| match ctx {
                DelayContext::Next {
                    upcoming: Some(v),
                } => v.as_u64().map(|n| Duration::from_millis(n * 10)),
                _ => None,
            }),
            0.0,
        );
        assert_eq!(p.next_delay(Some(&json!(7))), Duration::from_millis(70));
        assert_eq!(p.next_delay(None), DEFAULT_WAIT);
    }

    #[test]
    fn test_dynamic_zero_falls_back() {
        let p = PacingPolicy::new(
            Delay::dynamic(|_| Some(Duration::ZERO)),
            Delay::dynamic(|_| None),
            Arc::new(FixedRandom(0.0)),
        );
        assert_eq!(p.next_delay(Some(&json!(1))), DEFAULT_WAIT);
        assert_eq!(
            p.retry_delay(&CallError::fail("x"), &json!(1)),
            DEFAULT_RETRY_WAIT
        );
    }

    #[test]
    fn test_dynamic_retry_sees_error_and_params() {
        let p = PacingPolicy::new(
            Delay::millis(100),
            Delay::dynamic(|ctx| match ctx {
                DelayContext::Retry { error, params } if params == &&json!("slow") => {
                    Some(Duration::from_millis(error.to_string().len() as u64))
                }
                _ => None,
            }),
            Arc::new(FixedRandom(0.0)),
        );
        let err = CallError::fail("abc");
        assert_eq!(
            p.retry_delay(&err, &json!("slow")),
            Duration::from_millis(err.to_string().len() as u64)
        );
        assert_eq!(p.retry_delay(&err, &json!("fast")), DEFAULT_RETRY_WAIT);
    }
}
