//! Run clock.
//!
//! # Design
//!
//! Every timestamp in a run is measured from a single monotonic origin captured
//! by [`SimClock::start`] before any agent is spawned:
//!
//!   at = (Instant::now() - origin) as seconds
//!
//! The origin is never mutated after creation, so the clock is `Copy` and can
//! be handed to every agent thread without synchronisation.  Using `Instant`
//! rather than wall-clock time keeps timestamps monotonic even if the system
//! clock is adjusted mid-run.

use std::fmt;
use std::time::{Duration, Instant};

/// Monotonic elapsed-time source shared by all agents of one run.
#[derive(Copy, Clone, Debug)]
pub struct SimClock {
    origin: Instant,
}

impl SimClock {
    /// Capture the run origin.  Call once, before any agent starts.
    pub fn start() -> Self {
        Self { origin: Instant::now() }
    }

    /// Time elapsed since the origin.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    /// Elapsed seconds since the origin, with sub-microsecond resolution.
    #[inline]
    pub fn now_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// `true` once at least `mark` has elapsed since the origin.
    #[inline]
    pub fn reached(&self, mark: Duration) -> bool {
        self.elapsed() >= mark
    }

    /// The absolute instant corresponding to `offset` after the origin.
    #[inline]
    pub fn instant_at(&self, offset: Duration) -> Instant {
        self.origin + offset
    }

    /// Time left until `mark`, or zero if it has already passed.
    #[inline]
    pub fn remaining(&self, mark: Duration) -> Duration {
        mark.saturating_sub(self.elapsed())
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}s", self.now_secs())
    }
}
