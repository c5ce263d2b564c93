//! Domain types for the departure server.
//!
//! This module contains the timetable records and value types shared by the
//! schedule store, the planner and the feed reader. Value types enforce their
//! invariants at construction time.

mod calendar;
mod entities;
mod ids;
mod time;

pub use calendar::{CalendarException, ExceptionKind, ServicePattern, WeekdayFlags};
pub use entities::{Stop, StopTime, Trip};
pub use ids::{InvalidId, ServiceId, StopId, TripId};
pub use time::{QueryTime, ServiceTime, TimeError};
