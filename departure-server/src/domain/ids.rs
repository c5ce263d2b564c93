//! Feed identifier types.

use std::fmt;

/// Error returned when constructing an identifier from an empty string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: identifier cannot be empty")]
pub struct InvalidId {
    kind: &'static str,
}

/// Defines an opaque, non-empty string identifier from the feed.
///
/// Feed identifiers carry no structure beyond being non-empty, so the three
/// kinds share one shape and differ only in type.
macro_rules! feed_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier, rejecting empty strings.
            pub fn new(s: impl Into<String>) -> Result<Self, InvalidId> {
                let s = s.into();
                if s.is_empty() {
                    return Err(InvalidId { kind: $kind });
                }
                Ok(Self(s))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

feed_id!(
    /// A `stop_id` from `stops.txt`.
    ///
    /// ```
    /// use departure_server::domain::StopId;
    ///
    /// let id = StopId::new("DCS-1").unwrap();
    /// assert_eq!(id.as_str(), "DCS-1");
    /// assert!(StopId::new("").is_err());
    /// ```
    StopId,
    "stop id"
);

feed_id!(
    /// A `trip_id` from `trips.txt`.
    TripId,
    "trip id"
);

feed_id!(
    /// A `service_id` linking trips to calendar patterns.
    ServiceId,
    "service id"
);
