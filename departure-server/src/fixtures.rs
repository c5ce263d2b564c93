//! Small DART-like network shared by unit tests.
//!
//! ```text
//! UNIVERSITY      T1 08:00 DCS-1, T3 08:00 DCS-2, T2 09:00, T9 10:00, T11 11:00,
//!                 T6 23:53:20, T5 25:30:00 (weekdays), T10 07:10 (unknown service)
//! UNIVERSITY / INGERSOLL  T12 07:45 DCS-1 -> Ingersoll Ave 08:05 (weekdays)
//! FAIRGROUNDS     T4 07:30 DCS-1 -> Fairgrounds (weekdays)
//!                 T8 Maury St 06:00 -> Hubbell Ave -> Fairgrounds (weekdays)
//! MAURY ST        T7 10:00 DCS-1 -> Southridge -> Maury St (Saturdays, 2024 only)
//! GHOST           stop times for a trip missing from trips.txt
//! ```
//!
//! Weekday service runs 2024-12-01..=2025-06-30 except Monday 2025-01-20,
//! when Saturday service is added instead.

use chrono::NaiveDate;

use crate::domain::{
    CalendarException, ExceptionKind, ServiceId, ServicePattern, ServiceTime, Stop, StopId,
    StopTime, Trip, TripId, WeekdayFlags,
};
use crate::schedule::{FeedTables, ScheduleStore};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// `"HH:MM:SS"`, hours allowed past 23.
pub fn time(s: &str) -> ServiceTime {
    let parts: Vec<u32> = s.split(':').map(|p| p.parse().unwrap()).collect();
    ServiceTime::from_hms(parts[0], parts[1], parts[2]).unwrap()
}

pub fn stop_id(s: &str) -> StopId {
    StopId::new(s).unwrap()
}

fn stop(id: &str, name: &str) -> Stop {
    Stop::new(stop_id(id), name)
}

fn trip(id: &str, headsign: &str, service: &str, short_name: Option<&str>) -> Trip {
    Trip {
        id: TripId::new(id).unwrap(),
        headsign: Some(headsign.to_string()),
        service_id: ServiceId::new(service).unwrap(),
        short_name: short_name.map(str::to_string),
    }
}

fn calls(trip_id: &str, rows: &[(&str, &str)]) -> Vec<StopTime> {
    rows.iter()
        .map(|(stop, dep)| StopTime {
            trip_id: TripId::new(trip_id).unwrap(),
            stop_id: stop_id(stop),
            departure: time(dep),
        })
        .collect()
}

/// Wednesday with normal weekday service.
pub fn wednesday() -> NaiveDate {
    date(2025, 1, 1)
}

/// Saturday outside any calendar coverage.
pub fn saturday() -> NaiveDate {
    date(2025, 1, 4)
}

/// Monday holiday running Saturday service.
pub fn holiday() -> NaiveDate {
    date(2025, 1, 20)
}

pub fn tables() -> FeedTables {
    let stops = vec![
        stop("DCS-1", "DART Central Station"),
        stop("DCS-2", "DART Central Station"),
        stop("UNI", "University"),
        stop("FAIR", "Fairgrounds"),
        stop("MAURY", "Maury St"),
        stop("HUB", "Hubbell Ave"),
        stop("ING", "Ingersoll Ave"),
        stop("SOUTH", "Southridge"),
        stop("UNI-X", "university"),
    ];

    let trips = vec![
        trip("T1", "UNIVERSITY", "WKDY", Some("60")),
        trip("T2", "UNIVERSITY", "WKDY", Some("60")),
        trip("T3", "UNIVERSITY", "WKDY", None),
        trip("T4", "FAIRGROUNDS", "WKDY", Some("7")),
        trip("T5", "UNIVERSITY", "WKDY", Some("60N")),
        trip("T6", "UNIVERSITY", "WKDY", Some("60")),
        trip("T7", "MAURY ST", "SAT", Some("4")),
        trip("T8", "FAIRGROUNDS", "WKDY", Some("7")),
        trip("T9", "UNIVERSITY", "WKDY", Some("60")),
        trip("T10", "UNIVERSITY", "NOSUCH", Some("60X")),
        trip("T11", "UNIVERSITY", "WKDY", Some("60")),
        trip("T12", "UNIVERSITY / INGERSOLL", "WKDY", Some("5")),
    ];

    let stop_times = [
        calls("T1", &[("DCS-1", "08:00:00"), ("UNI", "08:50:00")]),
        calls("T2", &[("DCS-1", "09:00:00"), ("UNI", "09:50:00")]),
        calls("T3", &[("DCS-2", "08:00:00"), ("UNI", "08:45:00")]),
        calls("T4", &[("DCS-1", "07:30:00"), ("FAIR", "07:55:00")]),
        calls("T5", &[("DCS-1", "25:30:00"), ("UNI", "26:10:00")]),
        calls("T6", &[("DCS-1", "23:53:20"), ("UNI", "24:30:00")]),
        calls(
            "T7",
            &[("DCS-1", "10:00:00"), ("SOUTH", "10:10:00"), ("MAURY", "10:20:00")],
        ),
        calls(
            "T8",
            &[("MAURY", "06:00:00"), ("HUB", "06:15:00"), ("FAIR", "06:30:00")],
        ),
        calls("T9", &[("DCS-1", "10:00:00"), ("UNI", "10:50:00")]),
        calls("T10", &[("DCS-1", "07:10:00"), ("UNI", "07:55:00")]),
        calls("T11", &[("DCS-1", "11:00:00"), ("UNI", "11:50:00")]),
        calls("T12", &[("DCS-1", "07:45:00"), ("ING", "08:05:00")]),
        calls("GHOST", &[("DCS-1", "07:05:00"), ("ING", "07:20:00")]),
    ]
    .concat();

    let patterns = vec![
        ServicePattern {
            service_id: ServiceId::new("WKDY").unwrap(),
            weekdays: WeekdayFlags::from_bools(true, true, true, true, true, false, false),
            start_date: date(2024, 12, 1),
            end_date: date(2025, 6, 30),
        },
        ServicePattern {
            service_id: ServiceId::new("SAT").unwrap(),
            weekdays: WeekdayFlags::from_bools(false, false, false, false, false, true, false),
            start_date: date(2024, 6, 1),
            end_date: date(2024, 12, 31),
        },
    ];

    let exceptions = vec![
        CalendarException {
            service_id: ServiceId::new("WKDY").unwrap(),
            date: holiday(),
            kind: ExceptionKind::Removed,
        },
        CalendarException {
            service_id: ServiceId::new("SAT").unwrap(),
            date: holiday(),
            kind: ExceptionKind::Added,
        },
    ];

    FeedTables {
        stops,
        trips,
        stop_times,
        patterns,
        exceptions,
    }
}

pub fn store() -> ScheduleStore {
    ScheduleStore::new(tables())
}

/// A minimal on-disk feed: two stops, one weekday trip at 08:00.
pub const GTFS_FILES: &[(&str, &str)] = &[
    (
        "stops.txt",
        "stop_id,stop_name\nDCS-1,DART Central Station\nUNI,University\n",
    ),
    (
        "trips.txt",
        "route_id,service_id,trip_id,trip_headsign,trip_short_name\n60,WKDY,T1,UNIVERSITY,60\n",
    ),
    (
        "stop_times.txt",
        "trip_id,arrival_time,departure_time,stop_id,stop_sequence\n\
         T1,08:00:00,08:00:00,DCS-1,1\n\
         T1,08:50:00,08:50:00,UNI,2\n",
    ),
    (
        "calendar.txt",
        "service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date\n\
         WKDY,1,1,1,1,1,0,0,20241201,20250630\n",
    ),
];

/// Write [`GTFS_FILES`] into a fresh temporary directory.
pub fn gtfs_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, body) in GTFS_FILES {
        std::fs::write(dir.path().join(name), body).unwrap();
    }
    dir
}
