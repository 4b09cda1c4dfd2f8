//! The ferry's cyclic state machine.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use fc_core::{CycleId, EventKind, Role};
use fc_gate::CrossingGate;
use log::debug;

use crate::{AgentExit, EventEmitter, EventSink, ExitReason, StopToken};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum FerryPhase {
    Boarding,
    Crossing,
    Unboarding,
    Stopped,
}

/// Drives the gate through boarding → crossing → unboarding until stopped.
///
/// The ferry holds no state across cycles beyond its phase and a count of
/// completed crossings.
pub struct FerryController<S: EventSink> {
    gate:     Arc<CrossingGate>,
    stop:     StopToken,
    events:   EventEmitter<S>,
    crossing: Duration,
    phase:    FerryPhase,
    cycles:   u64,
}

impl<S: EventSink> FerryController<S> {
    pub fn new(
        gate:     Arc<CrossingGate>,
        stop:     StopToken,
        events:   EventEmitter<S>,
        crossing: Duration,
    ) -> Self {
        Self {
            gate,
            stop,
            events,
            crossing,
            phase:  FerryPhase::Boarding,
            cycles: 0,
        }
    }

    pub fn phase(&self) -> FerryPhase {
        self.phase
    }

    /// Run until the stop condition is seen at a checkpoint or the gate is
    /// closed under a blocked wait.
    pub fn run(mut self) -> AgentExit {
        // Docked and waiting before the first cycle.
        self.events.emit(Role::Ferry, EventKind::FerryArrived, CycleId(0));

        loop {
            if self.stop.is_stopped() {
                return self.exit(ExitReason::Stopped);
            }
            let cycle = CycleId(self.cycles + 1);

            // ── Boarding ──────────────────────────────────────────────────
            self.enter(FerryPhase::Boarding, cycle);
            self.gate.open_boarding();
            if self.gate.await_full().is_err() {
                return self.exit(ExitReason::Cancelled);
            }

            // Never start a crossing after the deadline.
            if self.stop.is_stopped() {
                return self.exit(ExitReason::Stopped);
            }
            let aboard = self.gate.boarded();
            let capacity = self.gate.capacity();
            assert_eq!(
                aboard, capacity,
                "ferry departing with {aboard} of {capacity} cars aboard",
            );

            // ── Crossing ──────────────────────────────────────────────────
            self.enter(FerryPhase::Crossing, cycle);
            self.events.emit(Role::Ferry, EventKind::FerryDeparted, cycle);
            thread::sleep(self.crossing);

            // ── Unboarding ────────────────────────────────────────────────
            self.enter(FerryPhase::Unboarding, cycle);
            self.events.emit(Role::Ferry, EventKind::FerryArrived, cycle);
            self.gate.open_unboarding();
            if self.gate.await_empty().is_err() {
                return self.exit(ExitReason::Cancelled);
            }

            self.cycles += 1;
        }
    }

    fn enter(&mut self, phase: FerryPhase, cycle: CycleId) {
        debug!("ferry {cycle}: {:?} -> {phase:?}", self.phase);
        self.phase = phase;
    }

    fn exit(&mut self, reason: ExitReason) -> AgentExit {
        debug!("ferry stopping in {:?} after {} crossings ({reason:?})", self.phase, self.cycles);
        self.phase = FerryPhase::Stopped;
        AgentExit { role: Role::Ferry, trips: self.cycles, reason }
    }
}
