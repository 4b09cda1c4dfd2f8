//! Unit and concurrency tests for fc-gate.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use fc_core::CarId;

use crate::{CrossingGate, GateError};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Per-car tallies returned by a car thread when the gate closes.
#[derive(Default, Debug)]
struct CarTally {
    boardings:   u64,
    unboardings: u64,
    fills:       u64,
    empties:     u64,
    max_seat:    usize,
}

/// A car that loops board → unboard until the gate is closed.
fn spawn_car(gate: Arc<CrossingGate>, id: u32) -> JoinHandle<CarTally> {
    thread::spawn(move || {
        let mut tally = CarTally::default();
        loop {
            let Ok(boarding) = gate.register_boarding(CarId(id), || ()) else {
                return tally;
            };
            tally.boardings += 1;
            tally.fills += boarding.filled as u64;
            tally.max_seat = tally.max_seat.max(boarding.seat);

            let Ok(departure) = gate.register_unboarding(CarId(id), || ()) else {
                return tally;
            };
            tally.unboardings += 1;
            tally.empties += departure.emptied as u64;
        }
    })
}

fn spawn_fleet(gate: &Arc<CrossingGate>, cars: u32) -> Vec<JoinHandle<CarTally>> {
    (1..=cars).map(|id| spawn_car(Arc::clone(gate), id)).collect()
}

fn close_and_join(gate: &CrossingGate, fleet: Vec<JoinHandle<CarTally>>) -> Vec<CarTally> {
    gate.close();
    fleet.into_iter().map(|h| h.join().unwrap()).collect()
}

/// Drive `cycles` full ferry cycles from the calling thread, checking the
/// counters after every wait.
fn drive_cycles(gate: &CrossingGate, cycles: u64) {
    let n = gate.capacity();
    for c in 1..=cycles {
        gate.open_boarding();
        gate.await_full().unwrap();
        let s = gate.snapshot();
        assert_eq!(s.boarded, n, "cycle {c}: departed with {} aboard", s.boarded);
        assert_eq!(s.full_posts, c);
        assert_eq!(s.empty_posts, c - 1);

        gate.open_unboarding();
        gate.await_empty().unwrap();
        let s = gate.snapshot();
        assert_eq!(s.boarded, 0, "cycle {c}: {} left aboard", s.boarded);
        assert_eq!(s.empty_posts, c);
        assert_eq!(s.full_posts, c);
    }
}

// ── Signal ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod signal_tests {
    use super::*;
    use crate::Signal;

    #[test]
    fn post_then_wait_consumes() {
        let s = Signal::new("s");
        s.post(3);
        assert_eq!(s.available(), 3);
        s.wait().unwrap();
        s.wait().unwrap();
        assert_eq!(s.available(), 1);
        assert_eq!(s.posted(), 3);
        assert_eq!(s.taken(), 2);
    }

    #[test]
    fn try_wait_does_not_block() {
        let s = Signal::new("s");
        assert_eq!(s.try_wait(), Ok(false));
        s.post(1);
        assert_eq!(s.try_wait(), Ok(true));
        assert_eq!(s.try_wait(), Ok(false));
    }

    #[test]
    fn post_zero_is_noop() {
        let s = Signal::new("s");
        s.post(0);
        assert_eq!(s.posted(), 0);
    }

    #[test]
    fn wait_blocks_until_post() {
        let s = Arc::new(Signal::new("s"));
        let waiter = {
            let s = Arc::clone(&s);
            thread::spawn(move || s.wait())
        };
        thread::sleep(Duration::from_millis(30));
        assert!(!waiter.is_finished());
        s.post(1);
        assert_eq!(waiter.join().unwrap(), Ok(()));
    }

    #[test]
    fn close_wakes_all_waiters() {
        let s = Arc::new(Signal::new("board_permit"));
        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let s = Arc::clone(&s);
                thread::spawn(move || s.wait())
            })
            .collect();
        thread::sleep(Duration::from_millis(20));
        s.close();
        for w in waiters {
            assert_eq!(w.join().unwrap(), Err(GateError::Closed { signal: "board_permit" }));
        }
    }

    #[test]
    fn closed_beats_leftover_permits() {
        let s = Signal::new("s");
        s.post(2);
        s.close();
        assert!(s.wait().is_err());
        assert!(s.try_wait().is_err());
        s.post(5);
        assert_eq!(s.available(), 2, "post after close must not add permits");
        s.close(); // idempotent
        assert!(s.is_closed());
    }
}

// ── Single cycle ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod cycle_tests {
    use super::*;

    #[test]
    fn five_cars_one_cycle() {
        let gate = Arc::new(CrossingGate::new(5));
        let fleet = spawn_fleet(&gate, 5);

        drive_cycles(&gate, 1);

        let tallies = close_and_join(&gate, fleet);
        assert_eq!(tallies.iter().map(|t| t.fills).sum::<u64>(), 1);
        assert_eq!(tallies.iter().map(|t| t.empties).sum::<u64>(), 1);
        for t in &tallies {
            assert_eq!(t.boardings, 1);
            assert_eq!(t.unboardings, 1);
        }
        let s = gate.snapshot();
        assert_eq!((s.boardings, s.unboardings), (5, 5));
        assert_eq!(s.completed_cycles(), 1);
    }

    #[test]
    fn seats_are_one_through_capacity() {
        let gate = Arc::new(CrossingGate::new(4));
        let seats = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let handles: Vec<_> = (1..=4)
            .map(|id| {
                let gate = Arc::clone(&gate);
                let seats = Arc::clone(&seats);
                thread::spawn(move || {
                    let b = gate.register_boarding(CarId(id), || ()).unwrap();
                    seats.lock().push((b.seat, b.filled));
                })
            })
            .collect();

        gate.open_boarding();
        gate.await_full().unwrap();
        for h in handles {
            h.join().unwrap();
        }

        let mut seats = seats.lock().clone();
        seats.sort();
        assert_eq!(seats, vec![(1, false), (2, false), (3, false), (4, true)]);
    }

    #[test]
    fn capacity_one_alternates() {
        let gate = Arc::new(CrossingGate::new(1));
        let fleet = spawn_fleet(&gate, 1);
        drive_cycles(&gate, 25);
        let tallies = close_and_join(&gate, fleet);
        assert_eq!(tallies[0].fills, 25);
        assert_eq!(tallies[0].max_seat, 1);
    }

    #[test]
    fn departure_receipts_count_down() {
        let gate = CrossingGate::new(2);
        gate.open_boarding();
        gate.register_boarding(CarId(1), || ()).unwrap();
        let second = gate.register_boarding(CarId(2), || ()).unwrap();
        assert!(second.filled);
        gate.await_full().unwrap();

        gate.open_unboarding();
        let first_off = gate.register_unboarding(CarId(2), || ()).unwrap();
        assert_eq!((first_off.remaining, first_off.emptied), (1, false));
        let last_off = gate.register_unboarding(CarId(1), || ()).unwrap();
        assert_eq!((last_off.remaining, last_off.emptied), (0, true));
        assert_eq!(last_off.cycle, fc_core::CycleId(1));
        gate.await_empty().unwrap();
        assert_eq!(gate.snapshot().cycle, fc_core::CycleId(2));
    }

    #[test]
    fn counted_hook_sees_final_receipt() {
        let gate = CrossingGate::new(2);
        gate.open_boarding();
        let mut seen = Vec::new();
        let a = gate
            .register_boarding_with(CarId(1), || (), |b| seen.push(*b))
            .unwrap();
        let b = gate
            .register_boarding_with(CarId(2), || (), |b| seen.push(*b))
            .unwrap();
        assert_eq!(seen, vec![a, b]);
        assert!(!a.filled && b.filled);
    }

    #[test]
    fn load_closure_runs_before_count() {
        let gate = CrossingGate::new(1);
        gate.open_boarding();
        let b = gate
            .register_boarding(CarId(1), || assert_eq!(gate.boarded(), 0))
            .unwrap();
        assert_eq!(b.seat, 1);

        gate.open_unboarding();
        gate.register_unboarding(CarId(1), || assert_eq!(gate.boarded(), 1))
            .unwrap();
        assert_eq!(gate.boarded(), 0);
    }
}

// ── Gating and invariants ─────────────────────────────────────────────────────

#[cfg(test)]
mod gating_tests {
    use super::*;

    #[test]
    fn no_fill_with_fewer_than_capacity() {
        let gate = Arc::new(CrossingGate::new(3));
        let fleet = spawn_fleet(&gate, 2);
        gate.open_boarding();

        let ferry = {
            let gate = Arc::clone(&gate);
            thread::spawn(move || gate.await_full())
        };
        thread::sleep(Duration::from_millis(50));
        assert!(!ferry.is_finished(), "ferry must not depart short-handed");
        assert_eq!(gate.boarded(), 2);

        gate.close();
        assert!(matches!(ferry.join().unwrap(), Err(GateError::Closed { .. })));
        let tallies: Vec<_> = fleet.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(tallies.iter().map(|t| t.fills).sum::<u64>(), 0);
    }

    #[test]
    fn no_boarding_without_permit() {
        let gate = Arc::new(CrossingGate::new(2));
        let fleet = spawn_fleet(&gate, 2);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(gate.boarded(), 0);
        let tallies = close_and_join(&gate, fleet);
        assert!(tallies.iter().all(|t| t.boardings == 0));
    }

    #[test]
    fn extra_cars_wait_for_next_cycle() {
        let gate = Arc::new(CrossingGate::new(2));
        let fleet = spawn_fleet(&gate, 5);
        drive_cycles(&gate, 10);
        let tallies = close_and_join(&gate, fleet);
        assert_eq!(tallies.iter().map(|t| t.boardings).sum::<u64>(), 20);
        assert!(tallies.iter().all(|t| t.max_seat <= 2));
    }

    #[test]
    fn close_releases_cars_aboard() {
        let gate = Arc::new(CrossingGate::new(2));
        let fleet = spawn_fleet(&gate, 2);
        gate.open_boarding();
        gate.await_full().unwrap();
        // Cars now wait for unboarding permits that will never come.
        let tallies = close_and_join(&gate, fleet);
        assert!(tallies.iter().all(|t| t.boardings == 1 && t.unboardings == 0));
        assert_eq!(gate.boarded(), 2, "cancellation must not touch the count");
        assert!(gate.is_closed());
    }

    #[test]
    #[should_panic(expected = "unboarded an empty ferry")]
    fn unboarding_empty_ferry_is_fatal() {
        let gate = CrossingGate::new(2);
        gate.open_unboarding();
        let _ = gate.register_unboarding(CarId(1), || ());
    }

    #[test]
    #[should_panic(expected = "boarded a full ferry")]
    fn overfilling_is_fatal() {
        let gate = CrossingGate::new(1);
        gate.open_boarding();
        gate.open_boarding();
        let _ = gate.register_boarding(CarId(1), || ());
        let _ = gate.register_boarding(CarId(2), || ());
    }
}

// ── Stress ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod stress_tests {
    use super::*;

    #[test]
    fn thousand_cycles_single_trigger() {
        const N: u32 = 5;
        const CYCLES: u64 = 1_000;

        let gate = Arc::new(CrossingGate::new(N as usize));
        let fleet = spawn_fleet(&gate, N);
        drive_cycles(&gate, CYCLES);
        let tallies = close_and_join(&gate, fleet);

        assert_eq!(tallies.iter().map(|t| t.fills).sum::<u64>(), CYCLES);
        assert_eq!(tallies.iter().map(|t| t.empties).sum::<u64>(), CYCLES);
        for t in &tallies {
            // With exactly N cars every car rides every cycle.
            assert_eq!(t.boardings, CYCLES);
            assert_eq!(t.unboardings, CYCLES);
            assert!(t.max_seat <= N as usize);
        }

        let s = gate.snapshot();
        assert_eq!(s.full_posts, CYCLES);
        assert_eq!(s.empty_posts, CYCLES);
        assert_eq!(s.boardings, CYCLES * N as u64);
        assert_eq!(s.boardings, s.unboardings);
    }

    #[test]
    fn oversubscribed_thousand_cycles() {
        const CYCLES: u64 = 1_000;
        let gate = Arc::new(CrossingGate::new(3));
        let fleet = spawn_fleet(&gate, 8);
        drive_cycles(&gate, CYCLES);
        let tallies = close_and_join(&gate, fleet);
        assert_eq!(tallies.iter().map(|t| t.fills).sum::<u64>(), CYCLES);
        assert_eq!(tallies.iter().map(|t| t.boardings).sum::<u64>(), CYCLES * 3);
    }
}
