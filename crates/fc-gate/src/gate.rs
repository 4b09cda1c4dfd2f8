//! The `CrossingGate` and its per-call receipts.

use log::debug;
use parking_lot::Mutex;

use fc_core::{CarId, CycleId};

use crate::{GateResult, Signal};

// ── Manifest (the mutual-exclusion region) ────────────────────────────────────

/// Everything guarded by the gate's critical section.  `boarded` is the only
/// datum the protocol depends on; the rest is bookkeeping for invariants and
/// reporting.
#[derive(Debug)]
struct Manifest {
    boarded:     usize,
    cycle:       CycleId,
    full_posts:  u64,
    empty_posts: u64,
    boardings:   u64,
    unboardings: u64,
}

/// Receipt returned by [`CrossingGate::register_boarding`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Boarding {
    pub car:    CarId,
    /// `boarded` immediately after this car's increment (1..=N).
    pub seat:   usize,
    pub cycle:  CycleId,
    /// `true` for the one car per cycle whose increment reached N and which
    /// therefore posted `full_signal`.
    pub filled: bool,
}

/// Receipt returned by [`CrossingGate::register_unboarding`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Departure {
    pub car:       CarId,
    /// `boarded` immediately after this car's decrement (0..N).
    pub remaining: usize,
    pub cycle:     CycleId,
    /// `true` for the one car per cycle whose decrement reached 0 and which
    /// therefore posted `empty_signal`.
    pub emptied:   bool,
}

/// Point-in-time copy of the gate's counters, taken under the region lock.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct GateSnapshot {
    pub capacity:    usize,
    pub boarded:     usize,
    /// The cycle currently in progress (completed cycles + 1).
    pub cycle:       CycleId,
    pub full_posts:  u64,
    pub empty_posts: u64,
    pub boardings:   u64,
    pub unboardings: u64,
}

impl GateSnapshot {
    /// Cycles whose unboarding has fully completed.
    #[inline]
    pub fn completed_cycles(&self) -> u64 {
        self.empty_posts
    }
}

// ── CrossingGate ──────────────────────────────────────────────────────────────

/// Shared coordination state between one ferry and its cars.
///
/// Created before any agent starts and shared through an `Arc`; it must
/// outlive every agent, which the owning `Sim` guarantees by joining all
/// threads before dropping it.
///
/// Lock order is always region → signal: the region posts `full_signal` /
/// `empty_signal` while held, and no signal waiter ever holds the region.
#[derive(Debug)]
pub struct CrossingGate {
    capacity:       usize,
    board_permit:   Signal,
    full_signal:    Signal,
    unboard_permit: Signal,
    empty_signal:   Signal,
    manifest:       Mutex<Manifest>,
}

impl CrossingGate {
    /// Create an empty gate for a ferry carrying `capacity` cars.
    ///
    /// # Panics
    /// Panics if `capacity` is zero; `FerryConfig::validate` rejects that
    /// before a gate is ever built.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "ferry capacity must be at least 1");
        Self {
            capacity,
            board_permit:   Signal::new("board_permit"),
            full_signal:    Signal::new("full_signal"),
            unboard_permit: Signal::new("unboard_permit"),
            empty_signal:   Signal::new("empty_signal"),
            manifest:       Mutex::new(Manifest {
                boarded:     0,
                cycle:       CycleId::FIRST,
                full_posts:  0,
                empty_posts: 0,
                boardings:   0,
                unboardings: 0,
            }),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // ── Ferry side ────────────────────────────────────────────────────────

    /// Release N boarding permits.  Never blocks.
    pub fn open_boarding(&self) {
        self.board_permit.post(self.capacity);
    }

    /// Block until the Nth car of this cycle has been counted.
    pub fn await_full(&self) -> GateResult<()> {
        self.full_signal.wait()
    }

    /// Release N unboarding permits.  Never blocks.
    pub fn open_unboarding(&self) {
        self.unboard_permit.post(self.capacity);
    }

    /// Block until the last car of this cycle has been counted off.
    pub fn await_empty(&self) -> GateResult<()> {
        self.empty_signal.wait()
    }

    // ── Car side ──────────────────────────────────────────────────────────

    /// Wait for a boarding permit, run `load` (the physical boarding work),
    /// then count the car aboard.
    ///
    /// If this increment brings `boarded` to N, `full_signal` is posted
    /// before the region is released.  `load` runs outside the region.
    pub fn register_boarding<F: FnOnce()>(&self, car: CarId, load: F) -> GateResult<Boarding> {
        self.register_boarding_with(car, load, |_| ())
    }

    /// [`register_boarding`](Self::register_boarding) with a `counted` hook.
    ///
    /// `counted` runs inside the region, after the increment and before
    /// `full_signal` is posted, so anything it records is ordered before the
    /// ferry can observe the fill.  It must not touch the gate.
    pub fn register_boarding_with<F, C>(&self, car: CarId, load: F, counted: C) -> GateResult<Boarding>
    where
        F: FnOnce(),
        C: FnOnce(&Boarding),
    {
        self.board_permit.wait()?;
        load();

        let mut m = self.manifest.lock();
        assert!(
            m.boarded < self.capacity,
            "car {car} boarded a full ferry ({} of {})",
            m.boarded,
            self.capacity,
        );
        m.boarded += 1;
        m.boardings += 1;

        let receipt = Boarding {
            car,
            seat:   m.boarded,
            cycle:  m.cycle,
            filled: m.boarded == self.capacity,
        };
        counted(&receipt);

        if receipt.filled {
            assert_eq!(
                m.full_posts, m.empty_posts,
                "full_signal posted twice in cycle {}", m.cycle,
            );
            m.full_posts += 1;
            self.full_signal.post(1);
            debug!("cycle {}: car {car} filled the ferry", m.cycle);
        }

        Ok(receipt)
    }

    /// Wait for an unboarding permit, run `unload` (the physical unboarding
    /// work, including any "left" notification), then count the car off.
    ///
    /// If this decrement brings `boarded` to 0, `empty_signal` is posted
    /// before the region is released and the cycle number advances.
    pub fn register_unboarding<F: FnOnce()>(&self, car: CarId, unload: F) -> GateResult<Departure> {
        self.unboard_permit.wait()?;
        unload();

        let mut m = self.manifest.lock();
        assert!(m.boarded > 0, "car {car} unboarded an empty ferry");
        m.boarded -= 1;
        m.unboardings += 1;

        let cycle = m.cycle;
        let emptied = m.boarded == 0;
        if emptied {
            assert_eq!(
                m.full_posts,
                m.empty_posts + 1,
                "empty_signal without a preceding full_signal in cycle {cycle}",
            );
            m.empty_posts += 1;
            m.cycle = cycle.next();
            self.empty_signal.post(1);
            debug!("cycle {cycle}: car {car} emptied the ferry");
        }

        Ok(Departure { car, remaining: m.boarded, cycle, emptied })
    }

    // ── Inspection ────────────────────────────────────────────────────────

    /// Current number of cars counted aboard.
    pub fn boarded(&self) -> usize {
        self.manifest.lock().boarded
    }

    pub fn snapshot(&self) -> GateSnapshot {
        let m = self.manifest.lock();
        GateSnapshot {
            capacity:    self.capacity,
            boarded:     m.boarded,
            cycle:       m.cycle,
            full_posts:  m.full_posts,
            empty_posts: m.empty_posts,
            boardings:   m.boardings,
            unboardings: m.unboardings,
        }
    }

    // ── Shutdown ──────────────────────────────────────────────────────────

    /// Close all four signals.  Every current and future wait on this gate
    /// returns `GateError::Closed`.  Counter updates already past their wait
    /// still complete, so the manifest stays consistent.
    pub fn close(&self) {
        self.board_permit.close();
        self.full_signal.close();
        self.unboard_permit.close();
        self.empty_signal.close();
    }

    pub fn is_closed(&self) -> bool {
        self.empty_signal.is_closed()
    }
}
