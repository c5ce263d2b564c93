//! Timetable records: stops, trips and stop times.

use super::{ServiceId, ServiceTime, StopId, TripId};

/// A boarding location. Display names are not unique: platforms and
/// directions of one station commonly share a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
}

impl Stop {
    pub fn new(id: StopId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// One scheduled run of a vehicle.
///
/// The headsign doubles as the human route name that callers search by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub id: TripId,
    pub headsign: Option<String>,
    pub service_id: ServiceId,
    /// Public-facing trip code, when the feed provides one.
    pub short_name: Option<String>,
}

impl Trip {
    /// The label shown to riders: the short name, falling back to the trip id.
    pub fn display_name(&self) -> &str {
        self.short_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(self.id.as_str())
    }
}

/// A scheduled visit of one trip to one stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopTime {
    pub trip_id: TripId,
    pub stop_id: StopId,
    pub departure: ServiceTime,
}
