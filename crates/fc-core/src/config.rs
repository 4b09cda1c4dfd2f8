//! Run configuration.
//!
//! Durations are stored as integer milliseconds with a `_ms` suffix so config
//! files stay readable; the accessor methods convert to [`Duration`].

use std::time::Duration;

use crate::{FerryError, FerryResult};

// ── DelayRange ────────────────────────────────────────────────────────────────

/// Inclusive range of milliseconds a randomized pause is drawn from.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const ZERO: DelayRange = DelayRange { min_ms: 0, max_ms: 0 };

    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// A range that always yields exactly `ms`.
    pub const fn fixed(ms: u64) -> Self {
        Self { min_ms: ms, max_ms: ms }
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.min_ms == self.max_ms
    }

    fn validate(&self, what: &str) -> FerryResult<()> {
        if self.min_ms > self.max_ms {
            return Err(FerryError::Config(format!(
                "{what}: min_ms {} exceeds max_ms {}",
                self.min_ms, self.max_ms
            )));
        }
        Ok(())
    }
}

// ── FerryConfig ───────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Loaded from a JSON file by the application crate (feature `serde`) or
/// built from [`Default`] and adjusted field by field.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FerryConfig {
    /// Cars per crossing (N).  The ferry never departs with fewer aboard.
    pub capacity: usize,

    /// Number of car agents.  Usually equal to `capacity`; fewer means the
    /// ferry can never fill and only shuts down through cancellation.
    pub car_count: usize,

    /// Nominal run length.  No boarding phase starts after this point.
    pub run_duration_ms: u64,

    /// Fixed transit pause between departure and arrival.
    pub crossing_ms: u64,

    /// Physical boarding time, spent after the permit and before counting.
    pub board_delay_ms: DelayRange,

    /// Physical unboarding time, spent after the permit and before counting.
    pub unboard_delay_ms: DelayRange,

    /// Time a car spends away from the dock between trips.
    pub away_delay_ms: DelayRange,

    /// Pause before each car is created.
    pub spawn_stagger_ms: DelayRange,

    /// After the deadline, how long the ferry may take to reach a checkpoint
    /// on its own before blocked waits are cancelled.
    pub drain_grace_ms: u64,

    /// After cancellation, how long agents may take to exit before the run
    /// fails with a shutdown timeout.
    pub shutdown_timeout_ms: u64,

    /// Master RNG seed for all randomized delays.
    pub seed: u64,
}

impl Default for FerryConfig {
    fn default() -> Self {
        Self {
            capacity:            5,
            car_count:           5,
            run_duration_ms:     60_000,
            crossing_ms:         3_000,
            board_delay_ms:      DelayRange::new(10, 50),
            unboard_delay_ms:    DelayRange::new(5, 25),
            away_delay_ms:       DelayRange::new(500, 1_500),
            spawn_stagger_ms:    DelayRange::new(1, 999),
            drain_grace_ms:      5_000,
            shutdown_timeout_ms: 2_000,
            seed:                42,
        }
    }
}

impl FerryConfig {
    /// Reject configurations the simulation cannot run.
    pub fn validate(&self) -> FerryResult<()> {
        if self.capacity == 0 {
            return Err(FerryError::Config("capacity must be at least 1".into()));
        }
        if self.car_count == 0 {
            return Err(FerryError::Config("car_count must be at least 1".into()));
        }
        if u32::try_from(self.car_count).is_err() {
            return Err(FerryError::Config(format!(
                "car_count {} does not fit a car id",
                self.car_count
            )));
        }
        self.board_delay_ms.validate("board_delay_ms")?;
        self.unboard_delay_ms.validate("unboard_delay_ms")?;
        self.away_delay_ms.validate("away_delay_ms")?;
        self.spawn_stagger_ms.validate("spawn_stagger_ms")?;
        Ok(())
    }

    /// `true` when there are too few cars to ever fill the ferry.
    #[inline]
    pub fn is_underpopulated(&self) -> bool {
        self.car_count < self.capacity
    }

    #[inline]
    pub fn run_duration(&self) -> Duration {
        Duration::from_millis(self.run_duration_ms)
    }

    #[inline]
    pub fn crossing(&self) -> Duration {
        Duration::from_millis(self.crossing_ms)
    }

    #[inline]
    pub fn drain_grace(&self) -> Duration {
        Duration::from_millis(self.drain_grace_ms)
    }

    #[inline]
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}
