//! Two-phase departure search.
//!
//! The destination text is first tried as a route name (trip headsign). Only
//! when no route name matches at all is it resolved as a stop, in which case
//! the search looks for trips calling at both the origin and the destination.
//! A route match that yields no usable departures is a final answer, never a
//! reason to fall back to the stop phase.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, trace};

use crate::domain::{ServiceId, ServiceTime, StopId, StopTime, TripId};
use crate::schedule::{NameResolver, ScheduleStore, active_services};

use super::config::{MAX_DEPARTURES, SearchConfig};

/// Source of the services running on a date.
///
/// This abstraction lets the planner run against a cached resolver in
/// production and the plain store in tests.
pub trait ServiceCalendar {
    /// Service ids operating on `date`.
    fn active_services(&self, date: NaiveDate) -> Arc<HashSet<ServiceId>>;
}

impl ServiceCalendar for ScheduleStore {
    fn active_services(&self, date: NaiveDate) -> Arc<HashSet<ServiceId>> {
        Arc::new(active_services(self, date))
    }
}

/// Request for departure search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Resolved boarding stops.
    pub origin_stops: Vec<StopId>,

    /// Free-text route or stop name.
    pub destination: String,

    /// Service date to search.
    pub date: NaiveDate,

    /// Earliest departure of interest, measured from midnight of `date`.
    pub not_before: ServiceTime,
}

impl SearchRequest {
    /// Create a new search request.
    pub fn new(
        origin_stops: Vec<StopId>,
        destination: impl Into<String>,
        date: NaiveDate,
        not_before: ServiceTime,
    ) -> Self {
        Self {
            origin_stops,
            destination: destination.into(),
            date,
            not_before,
        }
    }
}

/// One upcoming departure from the origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub trip_id: TripId,
    /// Short name, or the trip id when the feed has none.
    pub trip_name: String,
    pub headsign: Option<String>,
    /// The origin stop the trip departs from.
    pub stop_id: StopId,
    pub departure: ServiceTime,
}

/// How the destination text was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationMatch {
    /// Matched one or more route names.
    Route,
    /// Matched one or more stops.
    Stop,
}

/// Terminal state of a search whose destination resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Up to [`MAX_DEPARTURES`] departures, earliest first.
    Departures(Vec<Departure>),

    /// No single trip serves both origin and destination.
    NoDirectRoute,

    /// Matching trips exist but none run on the date.
    /// `network_idle` is set when no service at all runs that day.
    NoActiveService { network_idle: bool },

    /// Matching trips run that day but never call at the origin.
    NoDepartureFromOrigin,

    /// Every matching departure is earlier than the requested time.
    NoMoreDeparturesToday,
}

/// Result of departure search. Every path ends in exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    /// The destination matched route names or stops.
    Resolved {
        /// Label for display: the caller's text for a route match, the
        /// first matched stop's name for a stop match.
        destination: String,
        matched: DestinationMatch,
        outcome: SearchOutcome,
    },

    /// Neither a route nor a stop matched the destination text.
    Unresolved {
        destination: String,
        suggestions: Vec<String>,
    },
}

/// Departure planner over one snapshot.
pub struct DepartureSearch<'a, C: ServiceCalendar + ?Sized> {
    store: &'a ScheduleStore,
    calendar: &'a C,
    config: &'a SearchConfig,
}

impl<'a, C: ServiceCalendar + ?Sized> DepartureSearch<'a, C> {
    /// Create a new planner.
    pub fn new(store: &'a ScheduleStore, calendar: &'a C, config: &'a SearchConfig) -> Self {
        Self {
            store,
            calendar,
            config,
        }
    }

    /// Search for the next departures toward the request's destination.
    pub fn search(&self, request: &SearchRequest) -> SearchResult {
        let resolver = NameResolver::new(self.store);

        let routes = resolver.resolve_routes(&request.destination);
        if !routes.is_empty() {
            debug!(routes = ?routes, "destination matched route names");
            return SearchResult::Resolved {
                destination: request.destination.trim().to_string(),
                matched: DestinationMatch::Route,
                outcome: self.by_route(&routes, request),
            };
        }

        let destination_stops = resolver.resolve_stops(&request.destination);
        let Some(first) = destination_stops.first() else {
            debug!(destination = %request.destination, "destination unresolved");
            return SearchResult::Unresolved {
                destination: request.destination.trim().to_string(),
                suggestions: self.destination_suggestions(&resolver, &request.destination),
            };
        };

        debug!(
            stops = destination_stops.len(),
            "destination matched stop names"
        );
        let destination_ids: Vec<StopId> =
            destination_stops.iter().map(|s| s.id.clone()).collect();

        SearchResult::Resolved {
            destination: first.name.clone(),
            matched: DestinationMatch::Stop,
            outcome: self.by_stop(&destination_ids, request),
        }
    }

    /// Phase 1: trips whose headsign is one of `routes`.
    fn by_route(&self, routes: &[&str], request: &SearchRequest) -> SearchOutcome {
        let routes: HashSet<&str> = routes.iter().copied().collect();
        let active = self.calendar.active_services(request.date);

        let active_trips: HashSet<&TripId> = self
            .store
            .trips()
            .iter()
            .filter(|t| t.headsign.as_deref().is_some_and(|h| routes.contains(h)))
            .filter(|t| active.contains(&t.service_id))
            .map(|t| &t.id)
            .collect();

        if active_trips.is_empty() {
            return SearchOutcome::NoActiveService {
                network_idle: active.is_empty(),
            };
        }

        self.upcoming_from_origin(&active_trips, request)
    }

    /// Phase 2: trips calling at both an origin stop and a destination stop.
    fn by_stop(&self, destination_stops: &[StopId], request: &SearchRequest) -> SearchOutcome {
        let origin_trips = self.store.trips_serving(&request.origin_stops);
        let destination_trips = self.store.trips_serving(destination_stops);

        let common: HashSet<&TripId> = origin_trips
            .intersection(&destination_trips)
            .copied()
            .collect();
        trace!(common = common.len(), "trips serving origin and destination");

        if common.is_empty() {
            return SearchOutcome::NoDirectRoute;
        }

        let active = self.calendar.active_services(request.date);
        let active_trips: HashSet<&TripId> = common
            .into_iter()
            .filter(|id| {
                self.store
                    .trip(id)
                    .is_some_and(|t| active.contains(&t.service_id))
            })
            .collect();

        if active_trips.is_empty() {
            return SearchOutcome::NoActiveService {
                network_idle: active.is_empty(),
            };
        }

        self.upcoming_from_origin(&active_trips, request)
    }

    /// Origin rows of `trips` at or after the cursor, earliest first, capped.
    fn upcoming_from_origin(
        &self,
        trips: &HashSet<&TripId>,
        request: &SearchRequest,
    ) -> SearchOutcome {
        let stop_times = self.store.stop_times();
        let at_origin: Vec<&StopTime> = self
            .store
            .rows_at_any(&request.origin_stops)
            .into_iter()
            .map(|i| &stop_times[i])
            .filter(|st| trips.contains(&st.trip_id))
            .collect();

        if at_origin.is_empty() {
            return SearchOutcome::NoDepartureFromOrigin;
        }

        let mut upcoming: Vec<&StopTime> = at_origin
            .into_iter()
            .filter(|st| st.departure >= request.not_before)
            .collect();

        if upcoming.is_empty() {
            return SearchOutcome::NoMoreDeparturesToday;
        }

        // Stable: equal times keep table order.
        upcoming.sort_by_key(|st| st.departure);
        upcoming.truncate(MAX_DEPARTURES);

        let departures = upcoming
            .into_iter()
            .filter_map(|st| {
                let trip = self.store.trip(&st.trip_id)?;
                Some(Departure {
                    trip_id: trip.id.clone(),
                    trip_name: trip.display_name().to_string(),
                    headsign: trip.headsign.clone(),
                    stop_id: st.stop_id.clone(),
                    departure: st.departure,
                })
            })
            .collect();

        SearchOutcome::Departures(departures)
    }

    /// Route names first, then stop names, without repeats.
    fn destination_suggestions(&self, resolver: &NameResolver<'_>, text: &str) -> Vec<String> {
        let limit = self.config.max_suggestions;
        let mut suggestions = resolver.suggest_routes(text, limit);
        for name in resolver.suggest_stops(text, limit) {
            if !suggestions.contains(&name) {
                suggestions.push(name);
            }
        }
        suggestions.truncate(limit);
        suggestions
    }
}
