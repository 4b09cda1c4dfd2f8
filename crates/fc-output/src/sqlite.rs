//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `events` and `run_summary`.

use std::path::Path;

use rusqlite::Connection;

use crate::{EventRow, OutputResult, RunSummaryRow};
use crate::writer::OutputWriter;

/// Writes simulation output to an SQLite database.
///
/// Events arrive one at a time from the agents, so they are buffered inside
/// one open transaction that is committed by [`finish`](OutputWriter::finish).
pub struct SqliteWriter {
    conn:     Connection,
    in_tx:    bool,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS events (
                 at_secs REAL    NOT NULL,
                 role    TEXT    NOT NULL,
                 car_id  INTEGER,
                 kind    TEXT    NOT NULL,
                 cycle   INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS run_summary (
                 elapsed_secs  REAL    NOT NULL,
                 cycles        INTEGER NOT NULL,
                 boardings     INTEGER NOT NULL,
                 unboardings   INTEGER NOT NULL,
                 full_posts    INTEGER NOT NULL,
                 empty_posts   INTEGER NOT NULL,
                 forced_cancel INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, in_tx: false, finished: false })
    }

    fn begin(&mut self) -> OutputResult<()> {
        if !self.in_tx {
            self.conn.execute_batch("BEGIN")?;
            self.in_tx = true;
        }
        Ok(())
    }
}

impl OutputWriter for SqliteWriter {
    fn write_event(&mut self, row: &EventRow) -> OutputResult<()> {
        self.begin()?;
        let car_id = (row.car_id != u32::MAX).then_some(row.car_id);
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO events (at_secs, role, car_id, kind, cycle) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        stmt.execute(rusqlite::params![row.at_secs, row.role, car_id, row.kind, row.cycle as i64])?;
        Ok(())
    }

    fn write_summary(&mut self, row: &RunSummaryRow) -> OutputResult<()> {
        self.begin()?;
        self.conn.execute(
            "INSERT INTO run_summary \
             (elapsed_secs, cycles, boardings, unboardings, full_posts, empty_posts, forced_cancel) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                row.elapsed_secs,
                row.cycles as i64,
                row.boardings as i64,
                row.unboardings as i64,
                row.full_posts as i64,
                row.empty_posts as i64,
                row.forced_cancel as i64,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        if self.in_tx {
            self.in_tx = false;
            self.conn.execute_batch("COMMIT")?;
        }
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
