//! `fc-core` — foundational types for the `ferry_cross` rendezvous simulation.
//!
//! This crate is a dependency of every other `fc-*` crate.  It intentionally
//! has no `fc-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `CarId`, `CycleId`                                    |
//! | [`time`]        | `SimClock` (monotonic run origin)                     |
//! | [`config`]      | `FerryConfig`, `DelayRange`                           |
//! | [`rng`]         | `CarRng` (per-car), `SimRng` (global)                 |
//! | [`event`]       | `Event`, `EventKind`, `Role`                          |
//! | [`error`]       | `FerryError`, `FerryResult`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to config and event types.  |
//!           | Required to load `FerryConfig` from JSON.                  |

pub mod config;
pub mod error;
pub mod event;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{DelayRange, FerryConfig};
pub use error::{FerryError, FerryResult};
pub use event::{Event, EventKind, Role};
pub use ids::{CarId, CycleId};
pub use rng::{CarRng, SimRng};
pub use time::SimClock;
