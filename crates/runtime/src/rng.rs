//! Session roll streams backed by `rand`.

use battle_core::RandomSource;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Production [`RandomSource`]: OS entropy by default, or a fixed seed for
/// reproducible sessions.
#[derive(Clone, Debug)]
pub struct EntropyRng {
    inner: StdRng,
}

impl EntropyRng {
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded when `seed` is given, entropy otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }
}

impl RandomSource for EntropyRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }
}
