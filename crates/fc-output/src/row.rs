//! Flat row types written by the output backends.

use fc_core::{CarId, Event};
use fc_sim::RunReport;

/// One simulation event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventRow {
    pub at_secs: f64,
    /// `"ferry"` or `"car"`.
    pub role:    &'static str,
    /// `u32::MAX` for ferry events.
    pub car_id:  u32,
    pub kind:    &'static str,
    /// `0` for the ferry's arrival before the first cycle.
    pub cycle:   u64,
}

impl From<&Event> for EventRow {
    fn from(e: &Event) -> Self {
        Self {
            at_secs: e.at,
            role:    e.role.as_str(),
            car_id:  e.role.car_id().unwrap_or(CarId::INVALID).0,
            kind:    e.kind.as_str(),
            cycle:   e.cycle.0,
        }
    }
}

/// Totals for one finished run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummaryRow {
    pub elapsed_secs:  f64,
    pub cycles:        u64,
    pub boardings:     u64,
    pub unboardings:   u64,
    pub full_posts:    u64,
    pub empty_posts:   u64,
    pub forced_cancel: bool,
}

impl From<&RunReport> for RunSummaryRow {
    fn from(r: &RunReport) -> Self {
        Self {
            elapsed_secs:  r.elapsed.as_secs_f64(),
            cycles:        r.cycles,
            boardings:     r.gate.boardings,
            unboardings:   r.gate.unboardings,
            full_posts:    r.gate.full_posts,
            empty_posts:   r.gate.empty_posts,
            forced_cancel: r.forced_cancel,
        }
    }
}
