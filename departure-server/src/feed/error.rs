//! Feed loading error types.

/// Errors that can occur when reading a GTFS directory.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The directory itself could not be read as a feed.
    #[error("failed to open feed: {0}")]
    Open(#[source] gtfs_structures::Error),

    /// A required file is missing or one of its rows could not be parsed.
    #[error("failed to read {file}: {source}")]
    Gtfs {
        file: &'static str,
        #[source]
        source: gtfs_structures::Error,
    },

    /// A field parsed but its value is unusable.
    #[error("invalid {field} in {file}: {value:?}")]
    InvalidField {
        file: &'static str,
        field: &'static str,
        value: String,
    },

    /// Neither calendar.txt nor calendar_dates.txt is present.
    #[error("feed has neither calendar.txt nor calendar_dates.txt")]
    MissingCalendar,
}

impl FeedError {
    pub(crate) fn gtfs(file: &'static str) -> impl FnOnce(gtfs_structures::Error) -> Self {
        move |source| Self::Gtfs { file, source }
    }

    pub(crate) fn invalid(file: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidField {
            file,
            field,
            value: value.into(),
        }
    }
}
