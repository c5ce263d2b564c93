//! Immutable in-memory timetable snapshot.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::domain::{
    CalendarException, ServicePattern, Stop, StopId, StopTime, Trip, TripId,
};

/// The structured tables a snapshot is built from.
///
/// Row order is significant: it is the tie-break order for equal departure
/// times and the order name lookups return results in.
#[derive(Debug, Clone, Default)]
pub struct FeedTables {
    pub stops: Vec<Stop>,
    pub trips: Vec<Trip>,
    pub stop_times: Vec<StopTime>,
    pub patterns: Vec<ServicePattern>,
    pub exceptions: Vec<CalendarException>,
}

/// A frozen timetable with lookup indexes.
///
/// Built once and never mutated, so any number of queries can read it
/// concurrently through an `Arc` without locking. Reloading produces a new
/// store rather than editing this one.
#[derive(Debug)]
pub struct ScheduleStore {
    stops: Vec<Stop>,
    trips: Vec<Trip>,
    stop_times: Vec<StopTime>,
    patterns: Vec<ServicePattern>,

    /// Trip id → position in `trips`. First occurrence wins on duplicates.
    trip_index: HashMap<TripId, usize>,

    /// Stop id → positions in `stop_times`, ascending.
    rows_by_stop: HashMap<StopId, Vec<usize>>,

    exceptions_by_date: HashMap<NaiveDate, Vec<CalendarException>>,

    /// Distinct non-empty headsigns in first-seen trip order.
    route_names: Vec<String>,
}

impl ScheduleStore {
    /// Build a snapshot and its indexes from parsed tables.
    ///
    /// Dangling references are kept as-is; lookups treat a stop time whose
    /// trip is unknown, or a trip whose service is unknown, as never running.
    pub fn new(tables: FeedTables) -> Self {
        let FeedTables {
            stops,
            trips,
            stop_times,
            patterns,
            exceptions,
        } = tables;

        let mut trip_index = HashMap::with_capacity(trips.len());
        for (i, trip) in trips.iter().enumerate() {
            trip_index.entry(trip.id.clone()).or_insert(i);
        }

        let mut rows_by_stop: HashMap<StopId, Vec<usize>> = HashMap::new();
        for (i, st) in stop_times.iter().enumerate() {
            rows_by_stop.entry(st.stop_id.clone()).or_default().push(i);
        }

        let mut exceptions_by_date: HashMap<NaiveDate, Vec<CalendarException>> = HashMap::new();
        for exception in exceptions {
            exceptions_by_date
                .entry(exception.date)
                .or_default()
                .push(exception);
        }

        let mut seen = HashSet::new();
        let route_names = trips
            .iter()
            .filter_map(|t| t.headsign.as_deref())
            .filter(|h| !h.trim().is_empty())
            .filter(|h| seen.insert(*h))
            .map(str::to_string)
            .collect();

        Self {
            stops,
            trips,
            stop_times,
            patterns,
            trip_index,
            rows_by_stop,
            exceptions_by_date,
            route_names,
        }
    }

    /// All stops in table order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// All trips in table order.
    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// All stop times in table order.
    pub fn stop_times(&self) -> &[StopTime] {
        &self.stop_times
    }

    /// Weekly service patterns.
    pub fn patterns(&self) -> &[ServicePattern] {
        &self.patterns
    }

    /// Look up a trip by id.
    pub fn trip(&self, id: &TripId) -> Option<&Trip> {
        self.trip_index.get(id).map(|&i| &self.trips[i])
    }

    /// Positions in [`stop_times`](Self::stop_times) of rows at `stop`.
    pub fn rows_at(&self, stop: &StopId) -> &[usize] {
        self.rows_by_stop.get(stop).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Positions of rows at any of `stops`, ascending and without duplicates.
    pub fn rows_at_any<'s>(&self, stops: impl IntoIterator<Item = &'s StopId>) -> Vec<usize> {
        let mut rows: Vec<usize> = stops
            .into_iter()
            .flat_map(|s| self.rows_at(s).iter().copied())
            .collect();
        rows.sort_unstable();
        rows.dedup();
        rows
    }

    /// Ids of trips calling at any of `stops`.
    pub fn trips_serving<'s>(
        &self,
        stops: impl IntoIterator<Item = &'s StopId>,
    ) -> HashSet<&TripId> {
        stops
            .into_iter()
            .flat_map(|s| self.rows_at(s).iter())
            .map(|&i| &self.stop_times[i].trip_id)
            .collect()
    }

    /// Calendar exceptions for `date`.
    pub fn exceptions_on(&self, date: NaiveDate) -> &[CalendarException] {
        self.exceptions_by_date
            .get(&date)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Distinct route names (trip headsigns) in first-seen order.
    pub fn route_names(&self) -> &[String] {
        &self.route_names
    }
}
