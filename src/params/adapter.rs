//! # Argument normalization.
//!
//! An array entry is passed through as the argument list, enabling multi-argument
//! workers; any other value becomes a single argument. A worker that takes one
//! array argument therefore receives its items wrapped once more:
//!
//! ```text
//! 1            ──► [1]
//! [1, 2, 3]    ──► [1, 2, 3]        (three arguments)
//! [[1, 2, 3]]  ──► [[1, 2, 3]]      (one array argument)
//! ```

use serde_json::Value;

/// Returns the argument list for one parameter value.
///
/// # Example
/// ```
/// use serde_json::json;
/// use sequencer::params::normalize;
///
/// assert_eq!(normalize(&json!(7)), vec![json!(7)]);
/// assert_eq!(normalize(&json!([1, "a"])), vec![json!(1), json!("a")]);
/// ```
pub fn normalize(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(args) => args.clone(),
        other => vec![other.clone()],
    }
}
