//! Timestamped simulation events handed to the event sink.

use std::fmt;

use crate::{CarId, CycleId};

/// Who produced an event.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    Ferry,
    Car(CarId),
}

impl Role {
    /// The car id, or `None` for the ferry.
    #[inline]
    pub fn car_id(self) -> Option<CarId> {
        match self {
            Role::Ferry  => None,
            Role::Car(id) => Some(id),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Ferry  => "ferry",
            Role::Car(_) => "car",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Ferry   => write!(f, "Ferry"),
            Role::Car(id) => write!(f, "Car {id}"),
        }
    }
}

/// What happened.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// The ferry reached a dock (start of run, or end of a crossing).
    FerryArrived,
    /// The ferry left the dock with a full load.
    FerryDeparted,
    /// A car's boarding was counted.
    CarEntered,
    /// A car drove off; emitted before its departure is counted.
    CarLeft,
}

impl EventKind {
    /// Stable machine-readable tag.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::FerryArrived  => "ferry_arrived",
            EventKind::FerryDeparted => "ferry_departed",
            EventKind::CarEntered    => "car_entered",
            EventKind::CarLeft       => "car_left",
        }
    }

    /// Human-readable phrase used by the console log.
    pub fn describe(self) -> &'static str {
        match self {
            EventKind::FerryArrived  => "arrives to new dock",
            EventKind::FerryDeparted => "leaves the dock",
            EventKind::CarEntered    => "entered the ferry",
            EventKind::CarLeft       => "left the ferry",
        }
    }
}

/// One timestamped event.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    /// Seconds since the run origin.
    pub at:    f64,
    pub role:  Role,
    pub kind:  EventKind,
    pub cycle: CycleId,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Clock : {:.4}] {} {}", self.at, self.role, self.kind.describe())
    }
}
