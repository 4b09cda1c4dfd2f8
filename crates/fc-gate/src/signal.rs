//! Closable counting signal.
//!
//! A `Signal` is a counting semaphore built from a mutex-protected permit
//! count and a condition variable.  A signal created with zero permits serves
//! both coordination styles the gate needs:
//!
//! - **permit bursts**: the ferry posts N permits, up to N cars proceed;
//! - **single-fire notification**: one car posts one permit, the ferry
//!   consumes it.
//!
//! Unlike a plain semaphore, a `Signal` can be [closed](Signal::close).
//! Closing wakes every waiter and makes all later waits fail with
//! [`GateError::Closed`], so shutdown never depends on a permit that will
//! never be posted.

use parking_lot::{Condvar, Mutex};

use crate::{GateError, GateResult};

#[derive(Debug, Default)]
struct SignalState {
    permits: usize,
    closed:  bool,
    /// Lifetime totals, for inspection and tests.
    posted:  u64,
    taken:   u64,
}

/// Counting signal with cooperative cancellation.
#[derive(Debug)]
pub struct Signal {
    name:      &'static str,
    state:     Mutex<SignalState>,
    available: Condvar,
}

impl Signal {
    /// Create a signal with no permits.  `name` appears in errors and logs.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state:     Mutex::new(SignalState::default()),
            available: Condvar::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Add `n` permits and wake up to `n` waiters.  Never blocks beyond the
    /// internal lock.  Posting to a closed signal is a no-op.
    pub fn post(&self, n: usize) {
        if n == 0 {
            return;
        }
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        state.permits += n;
        state.posted += n as u64;
        drop(state);

        if n == 1 {
            self.available.notify_one();
        } else {
            self.available.notify_all();
        }
    }

    /// Block until a permit is available and consume it.
    ///
    /// Returns [`GateError::Closed`] if the signal is closed before a permit
    /// is obtained.  Closing takes precedence over leftover permits.
    pub fn wait(&self) -> GateResult<()> {
        let mut state = self.state.lock();
        loop {
            if state.closed {
                return Err(GateError::Closed { signal: self.name });
            }
            if state.permits > 0 {
                state.permits -= 1;
                state.taken += 1;
                return Ok(());
            }
            self.available.wait(&mut state);
        }
    }

    /// Consume a permit if one is available right now.
    pub fn try_wait(&self) -> GateResult<bool> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(GateError::Closed { signal: self.name });
        }
        if state.permits == 0 {
            return Ok(false);
        }
        state.permits -= 1;
        state.taken += 1;
        Ok(true)
    }

    /// Close the signal and wake every waiter.  Idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        drop(state);
        self.available.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Permits posted but not yet consumed.
    pub fn available(&self) -> usize {
        self.state.lock().permits
    }

    /// Total permits ever posted.
    pub fn posted(&self) -> u64 {
        self.state.lock().posted
    }

    /// Total permits ever consumed.
    pub fn taken(&self) -> u64 {
        self.state.lock().taken
    }
}
