//! The `Sim` struct, its threaded run loop, and the shutdown sequence.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use fc_core::{CarId, FerryConfig, FerryError, Role, SimClock, SimRng};
use fc_gate::{CrossingGate, GateSnapshot};
use log::{error, info, warn};
use parking_lot::{Mutex, MutexGuard};

use crate::{CarAgent, EventEmitter, EventSink, FerryController, SimError, SimResult, StopToken};

// ── Agent outcomes ────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ExitReason {
    /// Saw the stop condition at a checkpoint.
    Stopped,
    /// A gate wait returned because the gate was closed.
    Cancelled,
}

/// What one agent thread returned.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct AgentExit {
    pub role:   Role,
    /// Completed crossings (ferry) or completed round trips (car).
    pub trips:  u64,
    pub reason: ExitReason,
}

/// Summary of a finished run, also handed to [`EventSink::on_finish`].
#[derive(Clone, Debug)]
pub struct RunReport {
    pub elapsed:       Duration,
    /// Crossings the ferry completed (unboarding included).
    pub cycles:        u64,
    /// Gate counters after every agent was joined.
    pub gate:          GateSnapshot,
    /// One entry per spawned agent, ferry first.
    pub exits:         Vec<AgentExit>,
    /// `true` if any agent had to be released by closing the gate.
    pub forced_cancel: bool,
}

impl RunReport {
    pub fn exit_of(&self, role: Role) -> Option<&AgentExit> {
        self.exits.iter().find(|e| e.role == role)
    }

    /// Round trips completed by all cars together.
    pub fn car_trips(&self) -> u64 {
        self.exits
            .iter()
            .filter(|e| matches!(e.role, Role::Car(_)))
            .map(|e| e.trips)
            .sum()
    }
}

// ── Exit notification ─────────────────────────────────────────────────────────

/// Reports an agent thread's exit when dropped, including during a panic
/// unwind, so the run loop never waits on a thread that is already gone.
struct ExitNotice {
    role: Role,
    done: Sender<Role>,
}

impl Drop for ExitNotice {
    fn drop(&mut self) {
        let _ = self.done.send(self.role);
    }
}

fn spawn_agent<F>(role: Role, done: Sender<Role>, body: F) -> SimResult<JoinHandle<AgentExit>>
where
    F: FnOnce() -> AgentExit + Send + 'static,
{
    let name = match role {
        Role::Ferry   => "ferry".to_string(),
        Role::Car(id) => format!("car-{id}"),
    };
    thread::Builder::new()
        .name(name)
        .spawn(move || {
            let _notice = ExitNotice { role, done };
            body()
        })
        .map_err(|source| SimError::Spawn { role, source })
}

/// Receive exit notices until `until` returns `true` or `limit` passes.
fn collect_exits(
    done:    &Receiver<Role>,
    running: &mut BTreeSet<Role>,
    limit:   Instant,
    until:   impl Fn(&BTreeSet<Role>) -> bool,
) {
    while !until(running) {
        let now = Instant::now();
        if now >= limit {
            return;
        }
        match done.recv_timeout(limit - now) {
            Ok(role) => {
                running.remove(&role);
            }
            Err(RecvTimeoutError::Timeout) => return,
            Err(RecvTimeoutError::Disconnected) => {
                running.clear();
                return;
            }
        }
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation runner.
///
/// Owns the [`CrossingGate`] and the event sink for the whole run, hands
/// shared handles to one ferry thread and `car_count` car threads, and tears
/// everything down in this order:
///
/// 1. **Deadline**: the stop token trips; agents exit at their next
///    checkpoint.
/// 2. **Drain**: up to `drain_grace`, wait for the ferry (or every car) to
///    exit on its own.
/// 3. **Cancel**: close the gate; blocked waits return `Closed`.
/// 4. **Join**: up to `shutdown_timeout`, wait for every agent, then join.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<S: EventSink> {
    pub(crate) config:  FerryConfig,
    pub(crate) gate:    Arc<CrossingGate>,
    pub(crate) sink:    Arc<Mutex<S>>,
    pub(crate) rng:     SimRng,
    pub(crate) has_run: bool,
}

impl<S: EventSink> Sim<S> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run for `config.run_duration()` and shut down.  A `Sim` runs once.
    pub fn run(&mut self) -> SimResult<RunReport> {
        if self.has_run {
            return Err(SimError::AlreadyRun);
        }
        self.has_run = true;

        let clock = SimClock::start();
        let stop = StopToken::new(clock, self.config.run_duration());
        let events = EventEmitter::new(clock, Arc::clone(&self.sink));
        self.sink.lock().on_start(&self.config);
        info!(
            "ferry of capacity {} with {} cars for {:?}",
            self.config.capacity,
            self.config.car_count,
            self.config.run_duration(),
        );

        let (done_tx, done_rx) = mpsc::channel();
        let mut agents: Vec<(Role, JoinHandle<AgentExit>)> =
            Vec::with_capacity(self.config.car_count + 1);

        if let Err(e) = self.spawn_all(&stop, &events, done_tx, &mut agents) {
            error!("{e}; aborting run");
            stop.stop();
            self.gate.close();
            for (_, handle) in agents {
                let _ = handle.join();
            }
            return Err(e);
        }

        let mut running: BTreeSet<Role> = agents.iter().map(|(role, _)| *role).collect();

        // ── 1. Deadline ───────────────────────────────────────────────────
        //
        // Nothing exits before the deadline unless it panicked, so any notice
        // here ends the run early.
        let deadline = Instant::now() + clock.remaining(self.config.run_duration());
        let before = running.len();
        collect_exits(&done_rx, &mut running, deadline, |r| r.len() < before);
        if running.len() < before {
            warn!("agent exited before the deadline; stopping early");
        }
        stop.stop();

        // ── 2. Drain ──────────────────────────────────────────────────────
        //
        // Once the ferry is gone nobody posts permits; once every car is gone
        // the ferry cannot fill or empty.  Either way, waiting longer is moot.
        let drain_limit = Instant::now() + self.config.drain_grace();
        collect_exits(&done_rx, &mut running, drain_limit, |r| {
            !r.contains(&Role::Ferry) || !r.iter().any(|role| matches!(role, Role::Car(_)))
        });

        // ── 3. Cancel ─────────────────────────────────────────────────────
        if !running.is_empty() {
            info!("closing gate with {} agent(s) still running", running.len());
        }
        self.gate.close();

        // ── 4. Join ───────────────────────────────────────────────────────
        let join_limit = Instant::now() + self.config.shutdown_timeout();
        collect_exits(&done_rx, &mut running, join_limit, BTreeSet::is_empty);
        if !running.is_empty() {
            let stragglers: Vec<Role> = running.into_iter().collect();
            error!("shutdown timed out; still running: {stragglers:?}");
            return Err(SimError::ShutdownTimeout { stragglers });
        }

        let mut exits = Vec::with_capacity(agents.len());
        let mut panicked = None;
        for (role, handle) in agents {
            match handle.join() {
                Ok(exit) => exits.push(exit),
                Err(_) => {
                    error!("{role} panicked");
                    panicked.get_or_insert(role);
                }
            }
        }
        if let Some(role) = panicked {
            return Err(SimError::AgentPanicked(role));
        }

        let forced_cancel = exits.iter().any(|e| e.reason == ExitReason::Cancelled);
        if forced_cancel {
            warn!("shutdown needed gate cancellation to release blocked agents");
        }

        let report = RunReport {
            elapsed: clock.elapsed(),
            cycles: exits
                .iter()
                .find(|e| e.role == Role::Ferry)
                .map_or(0, |e| e.trips),
            gate: self.gate.snapshot(),
            exits,
            forced_cancel,
        };
        info!(
            "run finished after {:.3}s: {} crossings, {} car trips",
            report.elapsed.as_secs_f64(),
            report.cycles,
            report.car_trips(),
        );
        self.sink.lock().on_finish(&report);
        Ok(report)
    }

    pub fn config(&self) -> &FerryConfig {
        &self.config
    }

    pub fn gate(&self) -> &CrossingGate {
        &self.gate
    }

    /// Lock and borrow the event sink.
    pub fn sink(&self) -> MutexGuard<'_, S> {
        self.sink.lock()
    }

    /// Recover the event sink.  Returns `None` if a detached straggler
    /// thread from a timed-out shutdown still holds it.
    pub fn into_sink(self) -> Option<S> {
        Arc::try_unwrap(self.sink).ok().map(Mutex::into_inner)
    }

    // ── Spawning ──────────────────────────────────────────────────────────

    /// Spawn the ferry, then each car after its stagger delay.  Stops
    /// spawning cars if the deadline passes during the stagger.
    fn spawn_all(
        &mut self,
        stop:   &StopToken,
        events: &EventEmitter<S>,
        done:   Sender<Role>,
        agents: &mut Vec<(Role, JoinHandle<AgentExit>)>,
    ) -> SimResult<()> {
        let ferry = FerryController::new(
            Arc::clone(&self.gate),
            stop.clone(),
            events.clone(),
            self.config.crossing(),
        );
        agents.push((Role::Ferry, spawn_agent(Role::Ferry, done.clone(), move || ferry.run())?));

        for n in 1..=self.config.car_count {
            let stagger = self.rng.delay(self.config.spawn_stagger_ms);
            if !stop.sleep(stagger) {
                warn!(
                    "deadline reached while creating cars; {} of {} spawned",
                    n - 1,
                    self.config.car_count,
                );
                break;
            }
            let id = CarId::try_from(n)
                .map_err(|_| FerryError::Config(format!("car id {n} out of range")))?;
            let car = CarAgent::new(
                id,
                Arc::clone(&self.gate),
                stop.clone(),
                events.clone(),
                &self.config,
            );
            let role = Role::Car(id);
            agents.push((role, spawn_agent(role, done.clone(), move || car.run())?));
        }
        Ok(())
    }
}
