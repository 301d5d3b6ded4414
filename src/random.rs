//! Explicit, seedable random sources.
//!
//! Nothing in this crate touches a global generator: map generation, the
//! annealing engine and every Monte Carlo trial receive their own
//! [`StdRng`] derived from a caller-supplied seed.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic generator from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Seed of the `index`-th independent trial stream under `base`.
///
/// `seed_from_u64` expands the value through PCG32, so neighbouring seeds
/// still yield uncorrelated streams.
pub fn trial_seed(base: u64, index: usize) -> u64 {
    base.wrapping_add(index as u64)
}

/// Generator for the `index`-th trial stream under `base`.
pub fn trial_rng(base: u64, index: usize) -> StdRng {
    create_rng(trial_seed(base, index))
}
