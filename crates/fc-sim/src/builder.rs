//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use fc_core::{FerryConfig, SimRng};
use fc_gate::CrossingGate;
use log::warn;
use parking_lot::Mutex;

use crate::{EventSink, Sim, SimResult};

/// Fluent builder for [`Sim<S>`].
///
/// # Required inputs
///
/// - [`FerryConfig`] — capacity, car count, timings, seed, …
/// - `S: EventSink` — where events go
///
/// # Optional overrides
///
/// | Method          | Default                   |
/// |-----------------|---------------------------|
/// | `.car_count(n)` | `config.car_count`        |
/// | `.seed(s)`      | `config.seed`             |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, ConsoleSink::stdout())
///     .seed(7)
///     .build()?;
/// let report = sim.run()?;
/// ```
pub struct SimBuilder<S: EventSink> {
    config: FerryConfig,
    sink:   S,
}

impl<S: EventSink> SimBuilder<S> {
    pub fn new(config: FerryConfig, sink: S) -> Self {
        Self { config, sink }
    }

    pub fn car_count(mut self, n: usize) -> Self {
        self.config.car_count = n;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Validate the configuration and create the gate.  Nothing is spawned
    /// until [`Sim::run`].
    pub fn build(self) -> SimResult<Sim<S>> {
        self.config.validate()?;
        if self.config.is_underpopulated() {
            warn!(
                "{} cars for a ferry of capacity {}: the ferry can never fill",
                self.config.car_count, self.config.capacity,
            );
        }

        Ok(Sim {
            gate:    Arc::new(CrossingGate::new(self.config.capacity)),
            sink:    Arc::new(Mutex::new(self.sink)),
            rng:     SimRng::new(self.config.seed),
            config:  self.config,
            has_run: false,
        })
    }
}
