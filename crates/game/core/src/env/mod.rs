//! Environment collaborators injected into the engine.
//!
//! The engine owns no ambient resources. Randomness arrives through
//! [`RandomSource`] so callers decide between seeded replay, scripted rolls in
//! tests, or an entropy-seeded generator in production.
mod rng;

pub use rng::{PcgRng, RandomSource, ScriptedRng, compute_seed};
