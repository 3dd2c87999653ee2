//! # Content fingerprint for retry budgeting.
//!
//! Retry counters are keyed by what an item *is*, not where it sits: two offsets
//! holding structurally equal values share one budget.
//!
//! The key is the compact JSON text of the value. An absent value maps to
//! [`UNDEFINED_KEY`]; JSON never serializes anything to that bare word (strings
//! are always quoted), so it cannot collide with a caller-supplied value.

use serde_json::Value;

/// Key used for an absent parameter value.
pub const UNDEFINED_KEY: &str = "undefined";

/// Returns the retry-bucket key for `value`.
///
/// # Example
/// ```
/// use serde_json::json;
/// use sequencer::params::{fingerprint, UNDEFINED_KEY};
///
/// assert_eq!(fingerprint(Some(&json!([1, 2]))), "[1,2]");
/// assert_eq!(fingerprint(Some(&json!("undefined"))), "\"undefined\"");
/// assert_eq!(fingerprint(None), UNDEFINED_KEY);
/// ```
pub fn fingerprint(value: Option<&Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => UNDEFINED_KEY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deterministic() {
        let v = json!({"a": [1, 2], "b": {"c": 6}});
        assert_eq!(fingerprint(Some(&v)), fingerprint(Some(&v.clone())));
    }

    #[test]
    fn test_equal_values_collide() {
        assert_eq!(fingerprint(Some(&json!(5))), fingerprint(Some(&json!(5))));
        assert_eq!(
            fingerprint(Some(&json!([[1, 2, 3], [2, 3]]))),
            fingerprint(Some(&json!([[1, 2, 3], [2, 3]])))
        );
    }

    #[test]
    fn test_types_do_not_collide() {
        assert_ne!(fingerprint(Some(&json!(1))), fingerprint(Some(&json!("1"))));
        assert_ne!(fingerprint(Some(&json!(true))), fingerprint(Some(&json!("true"))));
        assert_ne!(fingerprint(Some(&json!(null))), fingerprint(None));
    }

    #[test]
    fn test_absent_sentinel_is_unforgeable() {
        assert_eq!(fingerprint(None), UNDEFINED_KEY);
        assert_ne!(fingerprint(Some(&json!(UNDEFINED_KEY))), UNDEFINED_KEY);
        assert_ne!(fingerprint(Some(&json!(""))), UNDEFINED_KEY);
    }
}
