//! Injectable random source for every roll the engine makes.
//!
//! Accuracy, crit, variance, drop and AI rolls all go through [`RandomSource`]
//! so a battle can be replayed exactly from a seed, or driven by a scripted
//! sequence in tests. Production code seeds a [`PcgRng`] from entropy outside
//! of this crate.

use std::collections::VecDeque;

/// Source of uniformly distributed random numbers.
///
/// Implementations must be deterministic for a given construction (seed or
/// script) so battles are reproducible.
pub trait RandomSource {
    /// Generate the next raw 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Uniform value in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0)
    }

    /// Percentile check: succeeds when the roll falls below `probability`.
    ///
    /// Probabilities at or above 1.0 always succeed and at or below 0.0 never
    /// do, but a roll is consumed either way so sequences stay aligned.
    fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Uniform index in `[0, len)`. Returns 0 for empty ranges.
    fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        let idx = (self.next_f64() * len as f64) as usize;
        idx.min(len - 1)
    }

    /// Symmetric jitter in `[-spread, +spread]`.
    fn jitter(&mut self, spread: f64) -> f64 {
        (self.next_f64() * 2.0 - 1.0) * spread
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }

    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }

    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
///
/// # Properties
///
/// - **Deterministic**: Same seed always produces same sequence
/// - **Fast**: Single multiply + xorshift + rotate
/// - **Small state**: Only 64 bits, cheap to embed per session
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    /// Create a generator from a seed.
    pub fn new(seed: u64) -> Self {
        let mut rng = Self { state: 0 };
        rng.state = Self::pcg_step(rng.state.wrapping_add(seed));
        rng
    }

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl Default for PcgRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RandomSource for PcgRng {
    fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = Self::pcg_step(old);
        Self::pcg_output(old)
    }
}

/// Replays a fixed sequence of `[0, 1)` rolls, then a fallback value.
///
/// Used to force outcomes: `0.0` always passes a percentile check,
/// `0.999` always fails one, `0.5` yields zero variance jitter.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    rolls: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedRng {
    /// Scripted rolls followed by `0.5` forever.
    pub fn new(rolls: impl IntoIterator<Item = f64>) -> Self {
        Self::with_fallback(rolls, 0.5)
    }

    /// Scripted rolls followed by `fallback` forever.
    pub fn with_fallback(rolls: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            fallback,
        }
    }

    /// Every roll returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::with_fallback([], value)
    }

    /// Appends more rolls to the script.
    pub fn push(&mut self, roll: f64) {
        self.rolls.push_back(roll);
    }

    /// Rolls not yet consumed.
    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl RandomSource for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_f64() * f64::from(u32::MAX)) as u32
    }

    fn next_f64(&mut self) -> f64 {
        self.rolls
            .pop_front()
            .unwrap_or(self.fallback)
            .clamp(0.0, 0.999_999_999)
    }
}

/// Derive an independent seed from a base seed and a session index.
///
/// Lets one master seed fan out into many isolated sessions without any two
/// sharing a random stream.
pub fn compute_seed(base_seed: u64, session: u64, salt: u32) -> u64 {
    let mut hash = base_seed;
    hash ^= session.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (salt as u64).wrapping_mul(0x85ebca6b);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
