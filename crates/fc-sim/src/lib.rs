//! `fc-sim` — agents and run loop for the ferry_cross simulation.
//!
//! # Agents
//!
//! ```text
//! ferry (1 thread)                       car (1 thread each)
//!   loop:                                  loop:
//!   ① stop? → exit                         ① stop? → exit
//!   ② open_boarding; await_full            ② register_boarding  → "entered"
//!   ③ stop? → exit                         ③ register_unboarding → "left"
//!   ④ "leaves the dock"; cross             ④ idle away (cut short by stop)
//!   ⑤ "arrives"; open_unboarding;
//!      await_empty
//! ```
//!
//! # Shutdown
//!
//! Agents only ever stop at the checkpoints above.  After the deadline the
//! run waits a bounded grace period for the ferry to get there on its own,
//! then closes the [`CrossingGate`](fc_gate::CrossingGate) so every wait that
//! can no longer be satisfied returns instead of blocking, then joins all
//! threads within a bounded timeout.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fc_core::FerryConfig;
//! use fc_sim::{EventLog, SimBuilder};
//!
//! let mut sim = SimBuilder::new(FerryConfig::default(), EventLog::default()).build()?;
//! let report = sim.run()?;
//! println!("{} crossings", report.cycles);
//! ```

pub mod builder;
pub mod car;
pub mod error;
pub mod ferry;
pub mod observer;
pub mod sim;
pub mod stop;


pub use builder::SimBuilder;
pub use car::{CarAgent, CarState};
pub use error::{SimError, SimResult};
pub use ferry::{FerryController, FerryPhase};
pub use observer::{EventEmitter, EventLog, EventSink, NoopSink};
pub use sim::{AgentExit, ExitReason, RunReport, Sim};
pub use stop::StopToken;
