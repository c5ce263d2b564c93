//! Departure planner.
//!
//! This module implements the core query algorithm that answers:
//! "when does the next bus leave this stop toward that destination?"
//!
//! The destination is matched as a route name first and as a stop second;
//! results are filtered by the service calendar and the requested time.

mod config;
mod search;


pub use config::{MAX_DEPARTURES, SearchConfig};
pub use search::{
    Departure, DepartureSearch, DestinationMatch, SearchOutcome, SearchRequest, SearchResult,
    ServiceCalendar,
};
