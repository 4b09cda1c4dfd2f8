//! Human-readable event log.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use fc_core::{Event, FerryConfig};
use fc_sim::{EventSink, RunReport};

/// An [`EventSink`] that prints one line per event:
///
/// ```text
/// [Clock : 0.0001] Ferry arrives to new dock
/// [Clock : 0.5210] Car 3 entered the ferry
/// [Clock : 2.4107] Ferry leaves the dock
/// ```
///
/// Events stamped after the optional cutoff are dropped.  The simulation
/// keeps running its shutdown after the deadline; whether that tail is shown
/// is up to the caller.
pub struct ConsoleSink<W: Write + Send + 'static> {
    out:        W,
    cutoff:     Option<f64>,
    printed:    u64,
    suppressed: u64,
    last_error: Option<io::Error>,
}

impl ConsoleSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + 'static> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, cutoff: None, printed: 0, suppressed: 0, last_error: None }
    }

    /// Drop events stamped later than `cutoff` after the start of the run.
    pub fn cutoff(mut self, cutoff: Duration) -> Self {
        self.cutoff = Some(cutoff.as_secs_f64());
        self
    }

    pub fn printed(&self) -> u64 {
        self.printed
    }

    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }

    /// Take the first write error, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.last_error.take()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send + 'static> EventSink for ConsoleSink<W> {
    fn on_start(&mut self, _config: &FerryConfig) {
        self.printed = 0;
        self.suppressed = 0;
    }

    fn emit(&mut self, event: &Event) {
        if self.cutoff.is_some_and(|c| event.at > c) {
            self.suppressed += 1;
            return;
        }
        match writeln!(self.out, "{event}") {
            Ok(()) => self.printed += 1,
            Err(e) => {
                self.last_error.get_or_insert(e);
            }
        }
    }

    fn on_finish(&mut self, _report: &RunReport) {
        if let Err(e) = self.out.flush() {
            self.last_error.get_or_insert(e);
        }
    }
}
