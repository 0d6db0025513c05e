//! Random variate generation
//!
//! This module contains the sources of randomness used by the engine: a
//! trait the engine draws through, an RNG-backed implementation for real
//! runs, and a scripted implementation for reproducing exact event orderings.

use rand::distributions::OpenClosed01;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Source of uniform draws and the exponential durations derived from them
///
/// Implementations must never return 0 from [`next_uniform`](Self::next_uniform),
/// otherwise the logarithm in [`exponential`](Self::exponential) is undefined.
pub trait VariateSource {
    /// Draw a uniform value in `(0, 1]`
    fn next_uniform(&mut self) -> f64;

    /// Draw an exponentially distributed duration with the given mean
    fn exponential(&mut self, mean: f64) -> f64 {
        -mean * self.next_uniform().ln()
    }
}

impl<V: VariateSource + ?Sized> VariateSource for &mut V {
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }

    fn exponential(&mut self, mean: f64) -> f64 {
        (**self).exponential(mean)
    }
}

impl<V: VariateSource + ?Sized> VariateSource for Box<V> {
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }

    fn exponential(&mut self, mean: f64) -> f64 {
        (**self).exponential(mean)
    }
}

/// Variate source backed by a [`rand::Rng`]
#[derive(Debug, Clone)]
pub struct RngVariates<R> {
    rng: R,
}

impl<R: Rng> RngVariates<R> {
    /// Wrap an existing random number generator
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngVariates<StdRng> {
    /// Create a reproducible source from a seed
    pub fn seeded(seed: u64) -> Self {
        debug!("Using deterministic seed: {}", seed);
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Create a source seeded from operating system entropy
    pub fn from_entropy() -> Self {
        debug!("Using entropy-based random seed");
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> VariateSource for RngVariates<R> {
    fn next_uniform(&mut self) -> f64 {
        self.rng.sample(OpenClosed01)
    }
}

/// Deterministic source that replays a fixed sequence of durations
///
/// [`exponential`](VariateSource::exponential) ignores the requested mean and
/// returns the next scripted duration, cycling back to the start once the
/// script is exhausted. An empty script falls back to returning the mean.
#[derive(Debug, Clone)]
pub struct ScriptedVariates {
    durations: Vec<f64>,
    position: usize,
}

impl ScriptedVariates {
    /// Create a source that replays `durations` in order
    pub fn new(durations: impl Into<Vec<f64>>) -> Self {
        Self { durations: durations.into(), position: 0 }
    }

    /// Number of draws taken so far
    pub fn draws(&self) -> usize {
        self.position
    }

    fn next_duration(&mut self) -> Option<f64> {
        if self.durations.is_empty() {
            return None;
        }
        let value = self.durations[self.position % self.durations.len()];
        self.position += 1;
        Some(value)
    }
}

impl VariateSource for ScriptedVariates {
    fn next_uniform(&mut self) -> f64 {
        // Invert the exponential with unit mean so the scripted value round-trips.
        match self.next_duration() {
            Some(duration) => (-duration).exp().clamp(f64::MIN_POSITIVE, 1.0),
            None => 1.0,
        }
    }

    fn exponential(&mut self, mean: f64) -> f64 {
        self.next_duration().unwrap_or(mean)
    }
}
