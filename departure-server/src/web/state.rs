//! Application state for the web layer.

use std::sync::Arc;

use crate::response::Formatter;
use crate::timetable::Timetable;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Active engine, swapped on reload
    pub timetable: Timetable,

    /// Renders outcomes in the agency's vocabulary
    pub formatter: Arc<Formatter>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(timetable: Timetable, formatter: Formatter) -> Self {
        Self {
            timetable,
            formatter: Arc::new(formatter),
        }
    }
}
