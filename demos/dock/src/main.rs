//! dock — runs one ferry and its cars for a fixed duration.
//!
//! ```text
//! dock [config.json]
//! ```
//!
//! Without an argument the default configuration is used (capacity 5, five
//! cars, one minute) with a seed taken from the system clock.  The console
//! shows the event log up to the deadline; every event, including the
//! shutdown tail, goes to `output/dock/events.csv`.  `ferry.json` next to
//! this crate is a shorter, oversubscribed example configuration.

use std::fs::File;
use std::io::{BufReader, Stdout};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use log::info;

use fc_core::{Event, EventKind, FerryConfig};
use fc_output::{ConsoleSink, CsvWriter, EventOutputSink};
use fc_sim::{EventSink, RunReport, SimBuilder};

const OUTPUT_DIR: &str = "output/dock";

// ── Sink wrapper: console + CSV, with counts ──────────────────────────────────

struct DockSink {
    console:    ConsoleSink<Stdout>,
    csv:        EventOutputSink<CsvWriter>,
    departures: u64,
    boardings:  u64,
}

impl DockSink {
    fn new(console: ConsoleSink<Stdout>, csv: EventOutputSink<CsvWriter>) -> Self {
        Self { console, csv, departures: 0, boardings: 0 }
    }
}

impl EventSink for DockSink {
    fn on_start(&mut self, config: &FerryConfig) {
        self.console.on_start(config);
        self.csv.on_start(config);
    }

    fn emit(&mut self, event: &Event) {
        match event.kind {
            EventKind::FerryDeparted => self.departures += 1,
            EventKind::CarEntered    => self.boardings += 1,
            _ => {}
        }
        self.console.emit(event);
        self.csv.emit(event);
    }

    fn on_finish(&mut self, report: &RunReport) {
        self.console.on_finish(report);
        self.csv.on_finish(report);
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

fn load_config(path: Option<&str>) -> Result<FerryConfig> {
    let Some(path) = path else {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(FerryConfig::default().seed);
        return Ok(FerryConfig { seed, ..FerryConfig::default() });
    };
    let file = File::open(path).with_context(|| format!("opening config {path}"))?;
    let config = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing config {path}"))?;
    Ok(config)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    let arg = std::env::args().nth(1);
    let config = load_config(arg.as_deref())?;
    println!("=== dock — ferry crossing ===");
    println!(
        "Capacity: {}  |  Cars: {}  |  Run: {:.1} s  |  Crossing: {:.1} s  |  Seed: {}",
        config.capacity,
        config.car_count,
        config.run_duration().as_secs_f64(),
        config.crossing().as_secs_f64(),
        config.seed,
    );
    println!();

    std::fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let console = ConsoleSink::stdout().cutoff(config.run_duration());
    let sink = DockSink::new(console, EventOutputSink::new(writer));

    let mut sim = SimBuilder::new(config, sink).build()?;
    let report = sim.run()?;
    info!("joined {} agents", report.exits.len());

    let mut sink = sim.sink();
    if let Some(e) = sink.console.take_error() {
        eprintln!("console error: {e}");
    }
    if let Some(e) = sink.csv.take_error() {
        eprintln!("output error: {e}");
    }

    println!();
    println!("Simulation complete in {:.3} s", report.elapsed.as_secs_f64());
    println!("  crossings      : {}", report.cycles);
    println!("  departures     : {}", sink.departures);
    println!("  boardings      : {}", sink.boardings);
    println!("  car round trips: {}", report.car_trips());
    if report.forced_cancel {
        println!("  (blocked agents were released by cancellation)");
    }
    println!("  {OUTPUT_DIR}/events.csv : {} rows", sink.csv.written());
    println!();

    println!("{:<10} {:<8} {:<10}", "Agent", "Trips", "Exit");
    println!("{}", "-".repeat(30));
    for exit in &report.exits {
        println!("{:<10} {:<8} {:<10}", exit.role.to_string(), exit.trips, format!("{:?}", exit.reason));
    }

    Ok(())
}
