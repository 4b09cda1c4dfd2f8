//! The car's cyclic state machine.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use fc_core::{CarId, CarRng, DelayRange, EventKind, FerryConfig, Role};
use fc_gate::CrossingGate;
use log::debug;

use crate::{AgentExit, EventEmitter, EventSink, ExitReason, StopToken};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CarState {
    WaitingToBoard,
    Aboard,
    Away,
    Stopped,
}

/// One car looping wait-to-board → aboard → away.
///
/// The id is the only thing that persists between trips; the same agent is
/// reused for the whole run.
pub struct CarAgent<S: EventSink> {
    id:            CarId,
    gate:          Arc<CrossingGate>,
    stop:          StopToken,
    events:        EventEmitter<S>,
    rng:           CarRng,
    board_delay:   DelayRange,
    unboard_delay: DelayRange,
    away_delay:    DelayRange,
    state:         CarState,
    trips:         u64,
}

impl<S: EventSink> CarAgent<S> {
    pub fn new(
        id:     CarId,
        gate:   Arc<CrossingGate>,
        stop:   StopToken,
        events: EventEmitter<S>,
        config: &FerryConfig,
    ) -> Self {
        Self {
            id,
            gate,
            stop,
            events,
            rng:           CarRng::new(config.seed, id),
            board_delay:   config.board_delay_ms,
            unboard_delay: config.unboard_delay_ms,
            away_delay:    config.away_delay_ms,
            state:         CarState::WaitingToBoard,
            trips:         0,
        }
    }

    pub fn id(&self) -> CarId {
        self.id
    }

    pub fn state(&self) -> CarState {
        self.state
    }

    pub fn run(mut self) -> AgentExit {
        let role = Role::Car(self.id);
        loop {
            if self.stop.is_stopped() {
                return self.exit(ExitReason::Stopped);
            }

            // ── Board ─────────────────────────────────────────────────────
            self.state = CarState::WaitingToBoard;
            let load = self.rng.delay(self.board_delay);
            let events = &self.events;
            let boarded = self.gate.register_boarding_with(
                self.id,
                || pause(load),
                |b| events.emit(role, EventKind::CarEntered, b.cycle),
            );
            let Ok(boarding) = boarded else {
                return self.exit(ExitReason::Cancelled);
            };
            self.state = CarState::Aboard;

            // ── Unboard ───────────────────────────────────────────────────
            let unload = self.rng.delay(self.unboard_delay);
            let events = &self.events;
            let left = self.gate.register_unboarding(self.id, || {
                pause(unload);
                events.emit(role, EventKind::CarLeft, boarding.cycle);
            });
            if left.is_err() {
                return self.exit(ExitReason::Cancelled);
            }
            self.trips += 1;

            // ── Away ──────────────────────────────────────────────────────
            self.state = CarState::Away;
            let away = self.rng.delay(self.away_delay);
            self.stop.sleep(away);
        }
    }

    fn exit(&mut self, reason: ExitReason) -> AgentExit {
        debug!("car {} stopping in {:?} after {} trips ({reason:?})", self.id, self.state, self.trips);
        self.state = CarState::Stopped;
        AgentExit { role: Role::Car(self.id), trips: self.trips, reason }
    }
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}
