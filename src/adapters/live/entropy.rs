//! Live adapters for the `Entropy` port.

use std::sync::Mutex;

use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng};

use crate::ports::Entropy;

/// Entropy drawn from the operating system.
pub struct OsEntropy;

impl OsEntropy {
    /// Creates a new OS-backed entropy source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for OsEntropy {
    fn default() -> Self {
        Self::new()
    }
}

impl Entropy for OsEntropy {
    fn pick(&self, bound: usize) -> usize {
        OsRng.gen_range(0..bound)
    }
}

/// Deterministic entropy for seeded generation requests.
pub struct SeededEntropy {
    rng: Mutex<StdRng>,
}

impl SeededEntropy {
    /// Creates a source that yields the same sequence for the same seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }
}

impl Entropy for SeededEntropy {
    fn pick(&self, bound: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        rng.gen_range(0..bound)
    }
}
