//! The `OutputWriter` trait implemented by the file backends.

use crate::{EventRow, OutputResult, RunSummaryRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// Errors are returned to the caller; [`EventOutputSink`][crate::EventOutputSink]
/// stores the first one for [`take_error`][crate::EventOutputSink::take_error].
pub trait OutputWriter: Send + 'static {
    fn write_event(&mut self, row: &EventRow) -> OutputResult<()>;

    /// Write the single end-of-run summary row.
    fn write_summary(&mut self, row: &RunSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying handles.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
