//! Uniform sampling helpers for the preset generators.
//!
//! All helpers take the `Rng` by parameter instead of reaching for a
//! thread-local source, so the generators stay pure over their input
//! stream: production code passes `rand::thread_rng()`, tests pass a
//! seeded `StdRng` and get reproducible systems.

use rand::Rng;

use super::vectors::NVec3;

/// Uniform sample in `[0, max)`.
pub fn uniform(rng: &mut impl Rng, max: f64) -> f64 {
    rng.gen_range(0.0..max)
}

/// Uniform sample in `[lo, hi)`.
pub fn uniform_between(rng: &mut impl Rng, lo: f64, hi: f64) -> f64 {
    rng.gen_range(lo..hi)
}

/// Uniform integer sample in `[0, max]` (inclusive upper bound).
pub fn uniform_index(rng: &mut impl Rng, max: usize) -> usize {
    rng.gen_range(0..=max)
}

/// Vector whose components are independent uniforms in `[-mag, +mag]`.
pub fn uniform_vector(rng: &mut impl Rng, mag: f64) -> NVec3 {
    NVec3::new(
        rng.gen_range(-mag..=mag),
        rng.gen_range(-mag..=mag),
        rng.gen_range(-mag..=mag),
    )
}
