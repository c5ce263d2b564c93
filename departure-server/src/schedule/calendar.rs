//! Service calendar resolution.
//!
//! Implements the `calendar.txt` / `calendar_dates.txt` rule: weekly patterns
//! first, then that date's exceptions, which win in both directions.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::domain::{ExceptionKind, ServiceId};

use super::store::ScheduleStore;

/// Service ids actually operating on `date`.
///
/// An empty set is an ordinary answer (a holiday, or a date outside the
/// feed's coverage), not an error.
pub fn active_services(store: &ScheduleStore, date: NaiveDate) -> HashSet<ServiceId> {
    let mut active: HashSet<ServiceId> = store
        .patterns()
        .iter()
        .filter(|p| p.covers(date))
        .map(|p| p.service_id.clone())
        .collect();

    for exception in store.exceptions_on(date) {
        match exception.kind {
            ExceptionKind::Added => {
                active.insert(exception.service_id.clone());
            }
            ExceptionKind::Removed => {
                active.remove(&exception.service_id);
            }
        }
    }

    active
}
