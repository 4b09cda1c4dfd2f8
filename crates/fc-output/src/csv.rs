//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `events.csv`
//! - `run_summary.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{EventRow, OutputResult, RunSummaryRow};
use crate::writer::OutputWriter;

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    events:   Writer<File>,
    summary:  Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut events = Writer::from_path(dir.join("events.csv"))?;
        events.write_record(["at_secs", "role", "car_id", "kind", "cycle"])?;

        let mut summary = Writer::from_path(dir.join("run_summary.csv"))?;
        summary.write_record([
            "elapsed_secs",
            "cycles",
            "boardings",
            "unboardings",
            "full_posts",
            "empty_posts",
            "forced_cancel",
        ])?;

        Ok(Self { events, summary, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_event(&mut self, row: &EventRow) -> OutputResult<()> {
        let car_id = if row.car_id == u32::MAX { String::new() } else { row.car_id.to_string() };
        self.events.write_record(&[
            format!("{:.4}", row.at_secs),
            row.role.to_string(),
            car_id,
            row.kind.to_string(),
            row.cycle.to_string(),
        ])?;
        Ok(())
    }

    fn write_summary(&mut self, row: &RunSummaryRow) -> OutputResult<()> {
        self.summary.write_record(&[
            format!("{:.4}", row.elapsed_secs),
            row.cycles.to_string(),
            row.boardings.to_string(),
            row.unboardings.to_string(),
            row.full_posts.to_string(),
            row.empty_posts.to_string(),
            (row.forced_cancel as u8).to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        self.summary.flush()?;
        Ok(())
    }
}
