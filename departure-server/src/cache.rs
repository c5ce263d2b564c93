//! Per-date memo of calendar resolution.
//!
//! Resolving the active services for a date scans every weekly pattern and
//! that date's exceptions. Queries cluster on a handful of dates (today,
//! tomorrow), so the result is cached per date for the lifetime of one
//! snapshot. A reload builds a fresh cache alongside the fresh snapshot.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use moka::sync::Cache as MokaCache;

use crate::domain::ServiceId;
use crate::planner::ServiceCalendar;
use crate::schedule::{ScheduleStore, active_services};

/// Configuration for the service-day cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of dates kept.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_capacity: 64 }
    }
}

/// Active-service sets keyed by date, bound to one snapshot.
pub struct ServiceDayCache {
    store: Arc<ScheduleStore>,
    days: MokaCache<NaiveDate, Arc<HashSet<ServiceId>>>,
}

impl ServiceDayCache {
    /// Create an empty cache over `store`.
    pub fn new(store: Arc<ScheduleStore>, config: &CacheConfig) -> Self {
        let days = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .build();

        Self { store, days }
    }

    /// Number of cached dates (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.days.run_pending_tasks();
        self.days.entry_count()
    }
}

impl ServiceCalendar for ServiceDayCache {
    fn active_services(&self, date: NaiveDate) -> Arc<HashSet<ServiceId>> {
        self.days
            .get_with(date, || Arc::new(active_services(&self.store, date)))
    }
}
