//! `EventOutputSink<W>` — bridges `EventSink` to an `OutputWriter`.

use fc_core::Event;
use fc_sim::{EventSink, RunReport};
use log::warn;

use crate::row::{EventRow, RunSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// An [`EventSink`] that writes every event and the final run summary to any
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `EventSink` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct EventOutputSink<W: OutputWriter> {
    writer:     W,
    written:    u64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> EventOutputSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0, last_error: None }
    }

    /// Take the stored write error (if any).  Returns `None` if all writes
    /// succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Events successfully written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!("output write failed: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> EventSink for EventOutputSink<W> {
    fn emit(&mut self, event: &Event) {
        let result = self.writer.write_event(&EventRow::from(event));
        if result.is_ok() {
            self.written += 1;
        }
        self.store_err(result);
    }

    fn on_finish(&mut self, report: &RunReport) {
        let result = self.writer.write_summary(&RunSummaryRow::from(report));
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
