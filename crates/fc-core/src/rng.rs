//! Deterministic per-car and simulation-level RNG wrappers.
//!
//! # Seeding strategy
//!
//! Each car gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (car_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive car IDs uniformly across the seed space.
//! This means:
//!
//! - Cars never share RNG state, so no lock is needed on the delay path.
//! - Adding cars at the end of the list does not disturb the delay sequences
//!   of existing cars.
//!
//! Thread interleaving is still nondeterministic; only the delays drawn by
//! each car are reproducible.

use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{CarId, DelayRange};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

fn sample_delay(rng: &mut SmallRng, range: DelayRange) -> Duration {
    if range.min_ms >= range.max_ms {
        return Duration::from_millis(range.min_ms);
    }
    Duration::from_millis(rng.gen_range(range.min_ms..=range.max_ms))
}

// ── CarRng ────────────────────────────────────────────────────────────────────

/// Per-car deterministic RNG.
///
/// Owned by the car's thread for the whole run; the type is `!Sync` so it
/// cannot be shared by accident.
pub struct CarRng(SmallRng);

impl CarRng {
    /// Seed deterministically from the run's global seed and a car ID.
    pub fn new(global_seed: u64, car: CarId) -> Self {
        let seed = global_seed ^ (car.0 as u64).wrapping_mul(MIXING_CONSTANT);
        CarRng(SmallRng::seed_from_u64(seed))
    }

    /// Draw a pause uniformly from `range` (inclusive).
    #[inline]
    pub fn delay(&mut self, range: DelayRange) -> Duration {
        sample_delay(&mut self.0, range)
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for global decisions (spawn stagger).
///
/// Used only on the thread that drives the run.  If another thread needs
/// randomness, derive a child from this one.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn delay(&mut self, range: DelayRange) -> Duration {
        sample_delay(&mut self.0, range)
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }
}
