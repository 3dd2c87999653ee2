//! Parameter shaping and retry keys.
//!
//! ## Contents
//! - [`normalize`]   turns one input entry into the worker's argument list
//! - [`fingerprint`] content key used to bucket retry counters
//!
//! ```text
//! item[o] ──► normalize() ──► Vec<Value> ──► Worker::call(args)
//!    └──────► fingerprint() ──► RetryBucket[key] += 1 on failure
//! ```

mod adapter;
mod fingerprint;

pub use adapter::normalize;
pub use fingerprint::{UNDEFINED_KEY, fingerprint};
