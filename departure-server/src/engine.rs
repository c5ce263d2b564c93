//! Query engine entry points.
//!
//! Transports talk to a [`DepartureSource`]. Which implementation backs it is
//! decided once at startup: [`ScheduleEngine`] when a feed is configured and
//! loaded, [`UnavailableEngine`] when the server runs without schedule data.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info};

use crate::cache::{CacheConfig, ServiceDayCache};
use crate::domain::QueryTime;
use crate::planner::{
    Departure, DepartureSearch, DestinationMatch, SearchConfig, SearchOutcome, SearchRequest,
    SearchResult,
};
use crate::schedule::{NameResolver, ScheduleStore};

/// What a query was about, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryContext {
    /// Display name of the first resolved origin stop.
    pub origin: String,
    /// Route text as given, or the first resolved destination stop's name.
    pub destination: String,
    pub matched: DestinationMatch,
    /// The naive local instant the query was evaluated at.
    pub at: NaiveDateTime,
}

/// Every way a departure query can end.
///
/// These are data, not faults: each names a different corrective action for
/// the caller (fix the timestamp, try another stop name, accept a transfer,
/// try another day).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Up to five departures, earliest first.
    Departures {
        context: QueryContext,
        departures: Vec<Departure>,
    },
    InvalidTimestamp {
        input: String,
    },
    OriginUnresolved {
        origin: String,
        suggestions: Vec<String>,
    },
    DestinationUnresolved {
        destination: String,
        suggestions: Vec<String>,
    },
    /// `network_idle` is set when nothing at all runs on the date.
    NoActiveService {
        context: QueryContext,
        network_idle: bool,
    },
    NoDepartureFromOrigin {
        context: QueryContext,
    },
    NoDirectRoute {
        context: QueryContext,
    },
    NoMoreDeparturesToday {
        context: QueryContext,
    },
    /// No schedule data is loaded.
    Unavailable,
}

/// The engine contract consumed by transports.
///
/// Implementations are shared across request handlers, so they must be
/// `Send + Sync`; queries never mutate them.
pub trait DepartureSource: Send + Sync {
    /// Next departures from `origin` toward `destination`.
    ///
    /// `when` is an ISO-8601 timestamp; absent means now (local time). Any UTC
    /// offset in `when` is discarded, not converted.
    fn next_departures(&self, origin: &str, destination: &str, when: Option<&str>) -> QueryOutcome {
        let at = match when {
            None => QueryTime::new(Local::now().naive_local()),
            Some(text) => match QueryTime::parse_iso(text) {
                Ok(at) => at,
                Err(e) => {
                    debug!(input = text, error = %e, "rejected query timestamp");
                    return QueryOutcome::InvalidTimestamp {
                        input: text.to_string(),
                    };
                }
            },
        };
        self.departures_at(origin, destination, at)
    }

    /// Next departures evaluated at a fixed instant.
    fn departures_at(&self, origin: &str, destination: &str, at: QueryTime) -> QueryOutcome;

    /// Distinct stop display names, alphabetical.
    fn list_stops(&self) -> Vec<String>;

    /// Distinct route names, alphabetical.
    fn list_routes(&self) -> Vec<String>;

    /// Number of stops in the loaded snapshot (zero when none is loaded).
    fn stop_count(&self) -> usize;
}

/// Engine backed by a loaded timetable snapshot.
pub struct ScheduleEngine {
    store: Arc<ScheduleStore>,
    calendar: ServiceDayCache,
    config: SearchConfig,
}

impl ScheduleEngine {
    /// Create an engine over `store`.
    pub fn new(store: Arc<ScheduleStore>, config: SearchConfig, cache: &CacheConfig) -> Self {
        let calendar = ServiceDayCache::new(store.clone(), cache);
        Self {
            store,
            calendar,
            config,
        }
    }
}

impl DepartureSource for ScheduleEngine {
    fn departures_at(&self, origin: &str, destination: &str, at: QueryTime) -> QueryOutcome {
        let resolver = NameResolver::new(&self.store);

        let origin_stops = resolver.resolve_stops(origin);
        let Some(first) = origin_stops.first() else {
            debug!(origin, "origin unresolved");
            return QueryOutcome::OriginUnresolved {
                origin: origin.trim().to_string(),
                suggestions: resolver.suggest_stops(origin, self.config.max_suggestions),
            };
        };
        let origin_name = first.name.clone();

        let request = SearchRequest::new(
            origin_stops.iter().map(|s| s.id.clone()).collect(),
            destination,
            at.date(),
            at.cursor(),
        );
        let planner = DepartureSearch::new(&self.store, &self.calendar, &self.config);
        let outcome = match planner.search(&request) {
            SearchResult::Unresolved {
                destination,
                suggestions,
            } => QueryOutcome::DestinationUnresolved {
                destination,
                suggestions,
            },
            SearchResult::Resolved {
                destination,
                matched,
                outcome,
            } => {
                let context = QueryContext {
                    origin: origin_name,
                    destination,
                    matched,
                    at: at.at(),
                };
                match outcome {
                    SearchOutcome::Departures(departures) => QueryOutcome::Departures {
                        context,
                        departures,
                    },
                    SearchOutcome::NoDirectRoute => QueryOutcome::NoDirectRoute { context },
                    SearchOutcome::NoActiveService { network_idle } => {
                        QueryOutcome::NoActiveService {
                            context,
                            network_idle,
                        }
                    }
                    SearchOutcome::NoDepartureFromOrigin => {
                        QueryOutcome::NoDepartureFromOrigin { context }
                    }
                    SearchOutcome::NoMoreDeparturesToday => {
                        QueryOutcome::NoMoreDeparturesToday { context }
                    }
                }
            }
        };

        info!(
            origin,
            destination,
            at = %at.at(),
            outcome = outcome_name(&outcome),
            "departure query"
        );
        outcome
    }

    fn list_stops(&self) -> Vec<String> {
        NameResolver::new(&self.store).stop_names()
    }

    fn list_routes(&self) -> Vec<String> {
        NameResolver::new(&self.store).route_names()
    }

    fn stop_count(&self) -> usize {
        self.store.stops().len()
    }
}

/// Engine used when no schedule data is configured.
///
/// Timestamps are still validated; every well-formed query answers
/// [`QueryOutcome::Unavailable`] and the listings are empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableEngine;

impl DepartureSource for UnavailableEngine {
    fn departures_at(&self, _origin: &str, _destination: &str, _at: QueryTime) -> QueryOutcome {
        QueryOutcome::Unavailable
    }

    fn list_stops(&self) -> Vec<String> {
        Vec::new()
    }

    fn list_routes(&self) -> Vec<String> {
        Vec::new()
    }

    fn stop_count(&self) -> usize {
        0
    }
}

/// Stable snake_case name of an outcome, used in logs and API errors.
pub fn outcome_name(outcome: &QueryOutcome) -> &'static str {
    match outcome {
        QueryOutcome::Departures { .. } => "departures",
        QueryOutcome::InvalidTimestamp { .. } => "invalid_timestamp",
        QueryOutcome::OriginUnresolved { .. } => "origin_unresolved",
        QueryOutcome::DestinationUnresolved { .. } => "destination_unresolved",
        QueryOutcome::NoActiveService { .. } => "no_active_service",
        QueryOutcome::NoDepartureFromOrigin { .. } => "no_departure_from_origin",
        QueryOutcome::NoDirectRoute { .. } => "no_direct_route",
        QueryOutcome::NoMoreDeparturesToday { .. } => "no_more_departures_today",
        QueryOutcome::Unavailable => "unavailable",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn engine() -> ScheduleEngine {
        ScheduleEngine::new(
            Arc::new(fixtures::store()),
            SearchConfig::default(),
            &CacheConfig::default(),
        )
    }

    #[test]
    fn next_departures_scenario() {
        let outcome = engine().next_departures("DART", "University", Some("2025-01-01T07:00:00"));

        let QueryOutcome::Departures {
            context,
            departures,
        } = outcome
        else {
            panic!("expected departures, got {outcome:?}");
        };
        assert_eq!(context.origin, "DART Central Station");
        assert_eq!(context.destination, "University");
        assert_eq!(context.matched, DestinationMatch::Route);
        assert_eq!(departures[0].departure.to_string(), "08:00:00");
        assert!(departures.len() <= 5);
    }

    #[test]
    fn invalid_timestamp_echoes_input() {
        let outcome = engine().next_departures("DART", "University", Some("invalid-datetime"));
        assert_eq!(
            outcome,
            QueryOutcome::InvalidTimestamp {
                input: "invalid-datetime".to_string()
            }
        );
    }

    #[test]
    fn unresolved_origin() {
        let outcome = engine().next_departures("Nonexistent Station", "University", None);
        let QueryOutcome::OriginUnresolved {
            origin,
            suggestions,
        } = outcome
        else {
            panic!("expected unresolved origin, got {outcome:?}");
        };
        assert_eq!(origin, "Nonexistent Station");
        assert!(suggestions.is_empty());
    }

    #[test]
    fn unresolved_origin_suggests_close_stops() {
        let outcome = engine().next_departures("Univ Hall", "University", None);
        let QueryOutcome::OriginUnresolved { suggestions, .. } = outcome else {
            panic!("expected unresolved origin, got {outcome:?}");
        };
        // Two stops differ only by case; the name is suggested once.
        assert_eq!(suggestions, vec!["University"]);
    }

    #[test]
    fn no_service_on_saturday() {
        let outcome = engine().next_departures("DART", "University", Some("2025-01-04T07:00:00"));
        assert!(matches!(
            outcome,
            QueryOutcome::NoActiveService {
                network_idle: true,
                ..
            }
        ));
    }

    #[test]
    fn offset_is_discarded() {
        let engine = engine();
        let naive = engine.next_departures("DART", "University", Some("2025-01-01T07:00:00"));
        let offset = engine.next_departures("DART", "University", Some("2025-01-01T07:00:00-06:00"));
        assert_eq!(naive, offset);
    }

    #[test]
    fn unresolved_destination_keeps_caller_text() {
        let outcome = engine().next_departures("DART", " Zzz ", Some("2025-01-01T07:00:00"));
        assert_eq!(
            outcome,
            QueryOutcome::DestinationUnresolved {
                destination: "Zzz".to_string(),
                suggestions: vec![]
            }
        );
    }

    #[test]
    fn stop_destination_context() {
        let outcome =
            engine().next_departures("DART", "Hubbell", Some("2025-01-01T07:00:00"));
        let QueryOutcome::NoDirectRoute { context } = outcome else {
            panic!("expected no direct route, got {outcome:?}");
        };
        assert_eq!(context.matched, DestinationMatch::Stop);
        assert_eq!(context.destination, "Hubbell Ave");
        assert_eq!(context.origin, "DART Central Station");
    }

    #[test]
    fn list_stops_distinct_sorted() {
        assert_eq!(
            engine().list_stops(),
            vec![
                "DART Central Station",
                "Fairgrounds",
                "Hubbell Ave",
                "Ingersoll Ave",
                "Maury St",
                "Southridge",
                "University",
            ]
        );
    }

    #[test]
    fn list_routes_sorted() {
        assert_eq!(
            engine().list_routes(),
            vec!["FAIRGROUNDS", "MAURY ST", "UNIVERSITY", "UNIVERSITY / INGERSOLL"]
        );
    }

    #[test]
    fn unavailable_engine() {
        let engine = UnavailableEngine;
        assert_eq!(
            engine.next_departures("DART", "University", None),
            QueryOutcome::Unavailable
        );
        assert!(matches!(
            engine.next_departures("DART", "University", Some("nope")),
            QueryOutcome::InvalidTimestamp { .. }
        ));
        assert!(engine.list_stops().is_empty());
        assert!(engine.list_routes().is_empty());
        assert_eq!(engine.stop_count(), 0);
    }

    #[test]
    fn outcome_names_are_snake_case() {
        assert_eq!(outcome_name(&QueryOutcome::Unavailable), "unavailable");
        assert_eq!(
            outcome_name(&QueryOutcome::InvalidTimestamp {
                input: String::new()
            }),
            "invalid_timestamp"
        );
    }
}
