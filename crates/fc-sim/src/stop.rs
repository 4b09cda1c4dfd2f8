//! Cooperative stop condition shared by every agent of a run.

use std::sync::Arc;
use std::time::{Duration, Instant};

use fc_core::SimClock;
use parking_lot::{Condvar, Mutex};

struct StopInner {
    stopped:  Mutex<bool>,
    wake:     Condvar,
    clock:    SimClock,
    deadline: Duration,
}

/// Stopped once [`stop`](Self::stop) has been called **or** the run clock has
/// reached the deadline, whichever comes first.
///
/// Agents poll [`is_stopped`](Self::is_stopped) at their checkpoints and use
/// [`sleep`](Self::sleep) for pauses that may be cut short.  The token never
/// interrupts a gate wait.
#[derive(Clone)]
pub struct StopToken {
    inner: Arc<StopInner>,
}

impl StopToken {
    pub fn new(clock: SimClock, deadline: Duration) -> Self {
        Self {
            inner: Arc::new(StopInner {
                stopped: Mutex::new(false),
                wake:    Condvar::new(),
                clock,
                deadline,
            }),
        }
    }

    /// Request a stop and wake every sleeper.  Idempotent.
    pub fn stop(&self) {
        *self.inner.stopped.lock() = true;
        self.inner.wake.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        *self.inner.stopped.lock() || self.inner.clock.reached(self.inner.deadline)
    }

    pub fn deadline(&self) -> Duration {
        self.inner.deadline
    }

    /// Sleep for up to `duration`.
    ///
    /// Returns `true` if the full duration elapsed, `false` if the token was
    /// (or became) stopped first.
    pub fn sleep(&self, duration: Duration) -> bool {
        let wake_at = Instant::now() + duration;
        let deadline_at = self.inner.clock.instant_at(self.inner.deadline);

        let mut stopped = self.inner.stopped.lock();
        loop {
            let now = Instant::now();
            if *stopped || now >= deadline_at {
                return false;
            }
            if now >= wake_at {
                return true;
            }
            self.inner.wake.wait_until(&mut stopped, wake_at.min(deadline_at));
        }
    }
}
