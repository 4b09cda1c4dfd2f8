//! `fc-output` — event sinks for the ferry_cross simulation.
//!
//! | Sink / backend          | Feature   | Produces                                  |
//! |-------------------------|-----------|-------------------------------------------|
//! | [`ConsoleSink`]         | *(none)*  | `[Clock : 1.2345] Car 3 entered the ferry` lines |
//! | [`CsvWriter`]           | *(none)*  | `events.csv`, `run_summary.csv`           |
//! | `SqliteWriter`          | `sqlite`  | `output.db`                               |
//!
//! File backends implement [`OutputWriter`] and are driven by
//! [`EventOutputSink`], which implements `fc_sim::EventSink`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fc_output::{CsvWriter, EventOutputSink};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut sim = SimBuilder::new(config, EventOutputSink::new(writer)).build()?;
//! sim.run()?;
//! if let Some(e) = sim.sink().take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod console;
pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use console::ConsoleSink;
pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::EventOutputSink;
pub use row::{EventRow, RunSummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
