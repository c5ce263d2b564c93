//! GTFS directory reader.
//!
//! Reads the subset of a static GTFS feed the departure engine needs into
//! [`FeedTables`], using the raw `gtfs-structures` reader so rows keep their
//! file order. `stops.txt`, `trips.txt` and `stop_times.txt` are required;
//! `calendar.txt` and `calendar_dates.txt` are each optional but at least one
//! must exist.

mod error;

use std::path::Path;

use gtfs_structures::{Exception, GtfsReader, RawStopTime, RawTrip};
use tracing::{debug, info, warn};

use crate::domain::{
    CalendarException, ExceptionKind, ServiceId, ServicePattern, ServiceTime, Stop, StopId,
    StopTime, Trip, TripId, WeekdayFlags,
};
use crate::schedule::FeedTables;

pub use error::FeedError;

const STOPS: &str = "stops.txt";
const TRIPS: &str = "trips.txt";
const STOP_TIMES: &str = "stop_times.txt";
const CALENDAR: &str = "calendar.txt";
const CALENDAR_DATES: &str = "calendar_dates.txt";

/// Load the feed in `dir`.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<FeedTables, FeedError> {
    let dir = dir.as_ref();
    debug!(dir = %dir.display(), "loading feed");

    let raw = GtfsReader::default()
        .raw()
        .read_from_path(dir)
        .map_err(FeedError::Open)?;

    let stops = raw
        .stops
        .map_err(FeedError::gtfs(STOPS))?
        .into_iter()
        .map(stop)
        .collect::<Result<Vec<_>, _>>()?;
    let trips = raw
        .trips
        .map_err(FeedError::gtfs(TRIPS))?
        .into_iter()
        .map(trip)
        .collect::<Result<Vec<_>, _>>()?;

    let mut stop_times = Vec::new();
    let mut untimed = 0usize;
    for row in raw.stop_times.map_err(FeedError::gtfs(STOP_TIMES))? {
        match stop_time(row)? {
            Some(st) => stop_times.push(st),
            None => untimed += 1,
        }
    }
    if untimed > 0 {
        debug!(rows = untimed, "skipped untimed stop times");
    }

    if raw.calendar.is_none() && raw.calendar_dates.is_none() {
        return Err(FeedError::MissingCalendar);
    }

    let patterns = raw
        .calendar
        .transpose()
        .map_err(FeedError::gtfs(CALENDAR))?
        .unwrap_or_default()
        .into_iter()
        .map(|calendar| {
            Ok(ServicePattern {
                service_id: ServiceId::new(calendar.id)
                    .map_err(|_| FeedError::invalid(CALENDAR, "service_id", ""))?,
                weekdays: WeekdayFlags::from_bools(
                    calendar.monday,
                    calendar.tuesday,
                    calendar.wednesday,
                    calendar.thursday,
                    calendar.friday,
                    calendar.saturday,
                    calendar.sunday,
                ),
                start_date: calendar.start_date,
                end_date: calendar.end_date,
            })
        })
        .collect::<Result<Vec<_>, FeedError>>()?;

    let exceptions = raw
        .calendar_dates
        .transpose()
        .map_err(FeedError::gtfs(CALENDAR_DATES))?
        .unwrap_or_default()
        .into_iter()
        .map(|date| {
            Ok(CalendarException {
                service_id: ServiceId::new(date.service_id)
                    .map_err(|_| FeedError::invalid(CALENDAR_DATES, "service_id", ""))?,
                date: date.date,
                kind: match date.exception_type {
                    Exception::Added => ExceptionKind::Added,
                    Exception::Deleted => ExceptionKind::Removed,
                },
            })
        })
        .collect::<Result<Vec<_>, FeedError>>()?;

    if stops.is_empty() || stop_times.is_empty() {
        warn!(dir = %dir.display(), "feed has no stops or no timed stop times");
    }

    info!(
        stops = stops.len(),
        trips = trips.len(),
        stop_times = stop_times.len(),
        patterns = patterns.len(),
        exceptions = exceptions.len(),
        "loaded feed"
    );

    Ok(FeedTables {
        stops,
        trips,
        stop_times,
        patterns,
        exceptions,
    })
}

fn stop(raw: gtfs_structures::Stop) -> Result<Stop, FeedError> {
    let id = StopId::new(raw.id).map_err(|_| FeedError::invalid(STOPS, "stop_id", ""))?;
    Ok(Stop::new(id, raw.name.unwrap_or_default()))
}

fn trip(raw: RawTrip) -> Result<Trip, FeedError> {
    Ok(Trip {
        id: TripId::new(raw.id).map_err(|_| FeedError::invalid(TRIPS, "trip_id", ""))?,
        service_id: ServiceId::new(raw.service_id)
            .map_err(|_| FeedError::invalid(TRIPS, "service_id", ""))?,
        headsign: non_blank(raw.trip_headsign),
        short_name: non_blank(raw.trip_short_name),
    })
}

/// `Ok(None)` for a row with neither a departure nor an arrival time.
fn stop_time(raw: RawStopTime) -> Result<Option<StopTime>, FeedError> {
    let Some(seconds) = raw.departure_time.or(raw.arrival_time) else {
        return Ok(None);
    };

    Ok(Some(StopTime {
        trip_id: TripId::new(raw.trip_id)
            .map_err(|_| FeedError::invalid(STOP_TIMES, "trip_id", ""))?,
        stop_id: StopId::new(raw.stop_id)
            .map_err(|_| FeedError::invalid(STOP_TIMES, "stop_id", ""))?,
        departure: ServiceTime::from_seconds(seconds),
    }))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
