//! `fc-gate` — the shared synchronization object of the ferry_cross simulation.
//!
//! # Protocol
//!
//! ```text
//!   ferry                                    car (× car_count)
//!   ─────                                    ─────────────────
//!   open_boarding()   ── board_permit ×N ──► register_boarding()
//!                                              └ region: boarded += 1
//!   await_full()      ◄── full_signal ×1 ──     (the Nth car posts)
//!   (cross)
//!   open_unboarding() ── unboard_permit ×N ─► register_unboarding()
//!                                              └ region: boarded -= 1
//!   await_empty()     ◄── empty_signal ×1 ──    (the last car posts)
//! ```
//!
//! The increment-check-post and decrement-check-post sequences each run inside
//! one critical section, so exactly one car observes `boarded == N` and
//! exactly one observes `boarded == 0` per cycle.
//!
//! # Cancellation
//!
//! [`CrossingGate::close`] closes all four signals.  Every blocked or future
//! wait then returns [`GateError::Closed`] instead of blocking, which is how a
//! run is torn down without interrupting threads.

pub mod error;
pub mod gate;
pub mod signal;

#[cfg(test)]
mod tests;

pub use error::{GateError, GateResult};
pub use gate::{Boarding, CrossingGate, Departure, GateSnapshot};
pub use signal::Signal;
