//! Timetable snapshot and the lookups built on it.
//!
//! The store is frozen after construction. Name resolution and calendar
//! resolution are read-only views over one snapshot.

mod calendar;
mod names;
mod store;

pub use calendar::active_services;
pub use names::{NameResolver, normalize};
pub use store::{FeedTables, ScheduleStore};
