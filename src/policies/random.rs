//! # Randomness for range delays.
//!
//! [`RandomSource`] yields samples in `[0, 1]`. The runner uses
//! [`ThreadRandom`] unless a source is injected through the builder;
//! [`FixedRandom`] makes range delays deterministic.

use rand::Rng;

/// Source of uniform samples in `[0, 1]`.
pub trait RandomSource: Send + Sync + 'static {
    /// Returns the next sample.
    fn sample(&self) -> f64;
}

/// Thread-local RNG from `rand`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn sample(&self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Always returns the same sample (clamped to `[0, 1]`).
#[derive(Clone, Copy, Debug)]
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn sample(&self) -> f64 {
        self.0.clamp(0.0, 1.0)
    }
}
