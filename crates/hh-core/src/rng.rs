//! Deterministic per-household RNG wrappers.
//!
//! # Determinism strategy
//!
//! Every household owns exactly one [`HouseholdRng`] (activity choice, route
//! choice) and one [`NormalRandom`] (device load variation), both seeded by:
//!
//!   seed = global_seed XOR (household_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive household IDs uniformly across the seed space.
//! Households never share RNG state, so running them on separate threads
//! yields the same results as running them one after another.

use rand::distributions::WeightedIndex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::HouseholdId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Offset separating the gaussian stream from the uniform stream of the same
/// household.
const NORMAL_STREAM: u64 = 0x5851_f42d_4c95_7f2d;

fn household_seed(global_seed: u64, household: HouseholdId) -> u64 {
    global_seed ^ u64::from(household.0).wrapping_mul(MIXING_CONSTANT)
}

// ── HouseholdRng ──────────────────────────────────────────────────────────────

/// Uniform RNG owned by one household's processing path.
pub struct HouseholdRng(SmallRng);

impl HouseholdRng {
    /// Seed deterministically from the run's global seed and a household ID.
    pub fn new(global_seed: u64, household: HouseholdId) -> Self {
        HouseholdRng(SmallRng::seed_from_u64(household_seed(global_seed, household)))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Pick an index proportionally to `weights`.
    ///
    /// Returns `None` when `weights` is empty, contains a negative value, or
    /// sums to zero.
    pub fn choose_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        let dist = WeightedIndex::new(weights).ok()?;
        Some(self.0.sample(dist))
    }
}

// ── NormalRandom ──────────────────────────────────────────────────────────────

/// Gaussian sampler for device load variation.
///
/// One instance per household, seeded once per run, so the same seed always
/// reproduces the same load curves.
pub struct NormalRandom(SmallRng);

impl NormalRandom {
    pub fn new(global_seed: u64, household: HouseholdId) -> Self {
        let seed = household_seed(global_seed, household) ^ NORMAL_STREAM;
        NormalRandom(SmallRng::seed_from_u64(seed))
    }

    /// Seed directly; used where no household context exists.
    pub fn from_seed(seed: u64) -> Self {
        NormalRandom(SmallRng::seed_from_u64(seed))
    }

    /// Draw from `N(mean, std_dev²)`.  A non-positive `std_dev` returns `mean`
    /// without consuming randomness.
    pub fn next_double(&mut self, mean: f64, std_dev: f64) -> f64 {
        if std_dev <= 0.0 {
            return mean;
        }
        let z: f64 = self.0.sample(StandardNormal);
        mean + std_dev * z
    }
}
