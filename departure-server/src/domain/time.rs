//! Timetable time handling.
//!
//! GTFS expresses stop times as "HH:MM:SS" measured from the start of the
//! service day, and hours may exceed 23 for trips that run past midnight.
//! This module keeps those times unwrapped so that ordering within a service
//! day stays chronological, and parses the caller's query instant.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day measured from service-day midnight, not wrapped at 24h.
///
/// A trip leaving at 1:30 AM as part of the previous day's service is
/// `25:30:00`, which sorts after `23:53:20` on the same service day.
///
/// # Examples
///
/// ```
/// use departure_server::domain::ServiceTime;
///
/// let late = ServiceTime::from_hms(25, 30, 0).unwrap();
/// assert_eq!(late.seconds(), 91_800);
/// assert_eq!(late.to_string(), "25:30:00");
///
/// let evening = ServiceTime::from_hms(23, 53, 20).unwrap();
/// assert!(evening < late);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ServiceTime(u32);

impl ServiceTime {
    /// Service-day midnight.
    pub const MIDNIGHT: Self = Self(0);

    /// Create from a raw number of seconds since service-day midnight.
    pub fn from_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    /// Create from components. Minutes and seconds must be below 60.
    pub fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Option<Self> {
        if minutes > 59 || seconds > 59 {
            return None;
        }
        let total = hours
            .checked_mul(3600)?
            .checked_add(minutes * 60 + seconds)?;
        Some(Self(total))
    }

    /// The offset of a wall-clock time from calendar midnight.
    pub fn of_day(time: NaiveTime) -> Self {
        Self(time.num_seconds_from_midnight())
    }

    /// Total seconds since service-day midnight.
    pub fn seconds(&self) -> u32 {
        self.0
    }

    /// Hours component, possibly 24 or more.
    pub fn hours(&self) -> u32 {
        self.0 / 3600
    }

    /// Minutes component (0-59).
    pub fn minutes(&self) -> u32 {
        (self.0 / 60) % 60
    }

    /// Seconds component (0-59).
    pub fn secs(&self) -> u32 {
        self.0 % 60
    }
}

impl fmt::Debug for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceTime({})", self)
    }
}

impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.secs()
        )
    }
}

/// Formats accepted for timestamps carrying a UTC offset.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
];

/// Formats accepted for naive local timestamps.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// The instant a departure query is evaluated at.
///
/// Always a naive local wall-clock time. When the caller's timestamp carries
/// a UTC offset, the offset is dropped rather than converted, so
/// `07:00:00-06:00` means 07:00 local.
///
/// # Examples
///
/// ```
/// use departure_server::domain::{QueryTime, ServiceTime};
///
/// let q = QueryTime::parse_iso("2025-01-01T07:00:00-06:00").unwrap();
/// assert_eq!(q.cursor(), ServiceTime::from_hms(7, 0, 0).unwrap());
/// assert_eq!(q.date().to_string(), "2025-01-01");
///
/// assert!(QueryTime::parse_iso("invalid-datetime").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTime {
    at: NaiveDateTime,
}

impl QueryTime {
    /// Create from a naive local date-time.
    pub fn new(at: NaiveDateTime) -> Self {
        Self { at }
    }

    /// Parse an ISO-8601 timestamp.
    ///
    /// Accepts an optional offset or `Z` suffix (discarded), optional
    /// fractional seconds, `T` or space as separator, minute precision, or a
    /// bare date (meaning midnight).
    pub fn parse_iso(s: &str) -> Result<Self, TimeError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TimeError::new("empty timestamp"));
        }

        let with_offset = match s.strip_suffix(['Z', 'z']) {
            Some(stripped) => format!("{stripped}+00:00"),
            None => s.to_string(),
        };

        for fmt in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(&with_offset, fmt) {
                return Ok(Self::new(dt.naive_local()));
            }
        }

        for fmt in NAIVE_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(Self::new(dt));
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self::new(date.and_time(NaiveTime::MIN)));
        }

        Err(TimeError::new("expected ISO-8601 timestamp"))
    }

    /// The calendar date used for service lookup.
    pub fn date(&self) -> NaiveDate {
        self.at.date()
    }

    /// Seconds since midnight of the query date.
    pub fn cursor(&self) -> ServiceTime {
        ServiceTime::of_day(self.at.time())
    }

    /// The full naive date-time.
    pub fn at(&self) -> NaiveDateTime {
        self.at
    }
}
