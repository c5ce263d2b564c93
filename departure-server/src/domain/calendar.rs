//! Service calendar records.
//!
//! A service runs on the weekdays of its pattern within a date range, and
//! per-date exceptions can add or remove it regardless of the pattern.

use chrono::{Datelike, NaiveDate, Weekday};

use super::ServiceId;

/// Compact set of weekdays a service pattern runs on.
///
/// ```
/// use chrono::Weekday;
/// use departure_server::domain::WeekdayFlags;
///
/// let weekdays = WeekdayFlags::from_bools(true, true, true, true, true, false, false);
/// assert!(weekdays.contains(Weekday::Wed));
/// assert!(!weekdays.contains(Weekday::Sat));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekdayFlags(u8);

impl WeekdayFlags {
    /// Build from `calendar.txt` style columns, Monday first.
    pub fn from_bools(
        mon: bool,
        tue: bool,
        wed: bool,
        thu: bool,
        fri: bool,
        sat: bool,
        sun: bool,
    ) -> Self {
        [mon, tue, wed, thu, fri, sat, sun]
            .into_iter()
            .enumerate()
            .filter(|(_, on)| *on)
            .fold(Self::default(), |flags, (i, _)| Self(flags.0 | (1 << i)))
    }

    /// Whether `day` is included.
    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & bit(day) != 0
    }
}

fn bit(day: Weekday) -> u8 {
    1 << day.num_days_from_monday()
}

/// A regular weekly operating pattern (`calendar.txt` row).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePattern {
    pub service_id: ServiceId,
    pub weekdays: WeekdayFlags,
    /// First operating date, inclusive.
    pub start_date: NaiveDate,
    /// Last operating date, inclusive.
    pub end_date: NaiveDate,
}

impl ServicePattern {
    /// Whether the weekly pattern alone covers `date`.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date && self.weekdays.contains(date.weekday())
    }
}

/// Direction of a calendar exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionKind {
    /// The service runs on this date even if its pattern says otherwise.
    Added,
    /// The service does not run on this date even if its pattern says it does.
    Removed,
}

/// A per-date override (`calendar_dates.txt` row).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarException {
    pub service_id: ServiceId,
    pub date: NaiveDate,
    pub kind: ExceptionKind,
}
