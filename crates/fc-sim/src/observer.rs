//! Event sink trait for logging and data collection.

use std::sync::Arc;

use fc_core::{CycleId, Event, EventKind, FerryConfig, Role, SimClock};
use parking_lot::Mutex;

use crate::RunReport;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] as the run progresses.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  The sink decides formatting and
/// suppression; the agents only report what happened and when.
///
/// # Threading
///
/// `emit` is called from every agent thread.  The simulation serialises calls
/// through one mutex, so implementations see events one at a time and in
/// timestamp order.  `emit` may run while a car holds the gate's counting
/// region, so it must never block on the simulation itself.
///
/// # Example: event counter
///
/// ```rust,ignore
/// struct Departures(u64);
///
/// impl EventSink for Departures {
///     fn emit(&mut self, event: &Event) {
///         if event.kind == EventKind::FerryDeparted {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait EventSink: Send + 'static {
    /// Called once before any agent is spawned.
    fn on_start(&mut self, _config: &FerryConfig) {}

    /// Called for every simulation event.
    fn emit(&mut self, _event: &Event) {}

    /// Called once after every agent has been joined.
    fn on_finish(&mut self, _report: &RunReport) {}
}

/// An [`EventSink`] that does nothing.
pub struct NoopSink;

impl EventSink for NoopSink {}

// ── EventLog ──────────────────────────────────────────────────────────────────

/// An [`EventSink`] that keeps every event in memory.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    pub events:  Vec<Event>,
    pub config:  Option<FerryConfig>,
    pub report:  Option<RunReport>,
}

impl EventLog {
    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    /// Events of `kind` belonging to `cycle`.
    pub fn in_cycle(&self, kind: EventKind, cycle: CycleId) -> impl Iterator<Item = &Event> {
        self.events
            .iter()
            .filter(move |e| e.kind == kind && e.cycle == cycle)
    }

    pub fn for_role(&self, role: Role) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.role == role)
    }
}

impl EventSink for EventLog {
    fn on_start(&mut self, config: &FerryConfig) {
        self.config = Some(config.clone());
    }

    fn emit(&mut self, event: &Event) {
        self.events.push(*event);
    }

    fn on_finish(&mut self, report: &RunReport) {
        self.report = Some(report.clone());
    }
}

// ── EventEmitter ──────────────────────────────────────────────────────────────

/// The handle agents use to report events: the run clock plus the shared sink.
pub struct EventEmitter<S: EventSink> {
    clock: SimClock,
    sink:  Arc<Mutex<S>>,
}

impl<S: EventSink> Clone for EventEmitter<S> {
    fn clone(&self) -> Self {
        Self { clock: self.clock, sink: Arc::clone(&self.sink) }
    }
}

impl<S: EventSink> EventEmitter<S> {
    pub fn new(clock: SimClock, sink: Arc<Mutex<S>>) -> Self {
        Self { clock, sink }
    }

    /// Timestamp and deliver one event.  The timestamp is taken under the
    /// sink lock so the sink sees non-decreasing times.
    pub fn emit(&self, role: Role, kind: EventKind, cycle: CycleId) {
        let mut sink = self.sink.lock();
        let event = Event { at: self.clock.now_secs(), role, kind, cycle };
        sink.emit(&event);
    }

    pub fn clock(&self) -> SimClock {
        self.clock
    }
}
