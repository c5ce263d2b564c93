//! Rendering of query outcomes for people.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::engine::{QueryContext, QueryOutcome, outcome_name};
use crate::planner::DestinationMatch;

/// Envelope returned by every query operation.
///
/// `success` is true only for departures and non-empty listings. Otherwise
/// `data` carries the explanation and `error` names the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub success: bool,
    pub data: String,
    pub error: Option<String>,
}

impl QueryResponse {
    fn ok(data: String) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    fn failed(code: &str, data: String) -> Self {
        Self {
            success: false,
            data,
            error: Some(code.to_string()),
        }
    }
}

/// Formats outcomes and listings in the agency's vocabulary.
#[derive(Debug, Clone)]
pub struct Formatter {
    agency: String,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new("DART")
    }
}

impl Formatter {
    pub fn new(agency: impl Into<String>) -> Self {
        Self {
            agency: agency.into(),
        }
    }

    pub fn agency(&self) -> &str {
        &self.agency
    }

    /// Render a departure query outcome. Never fails.
    pub fn departures(&self, outcome: &QueryOutcome) -> QueryResponse {
        let code = outcome_name(outcome);
        match outcome {
            QueryOutcome::Departures {
                context,
                departures,
            } => {
                let mut body = format!(
                    "Next {} bus departures from {} to {} on {}:\n(Current time: {})\n\n",
                    self.agency,
                    context.origin,
                    context.destination,
                    long_date(context.at),
                    context.at.format("%I:%M %p"),
                );
                let lines: Vec<String> = departures
                    .iter()
                    .map(|d| match d.headsign.as_deref().filter(|h| !h.is_empty()) {
                        Some(headsign) => {
                            format!("• Bus {}: {} (to {headsign})", d.trip_name, d.departure)
                        }
                        None => format!("• Bus {}: {}", d.trip_name, d.departure),
                    })
                    .collect();
                body.push_str(&lines.join("\n"));
                QueryResponse::ok(body)
            }
            QueryOutcome::InvalidTimestamp { input } => QueryResponse::failed(
                code,
                format!("Invalid datetime format: {input}. Please use ISO-8601 format."),
            ),
            QueryOutcome::OriginUnresolved {
                origin,
                suggestions,
            } => {
                let hint = if suggestions.is_empty() {
                    " Use the stop list to see all available stops.".to_string()
                } else {
                    format!(" Did you mean one of these? {}", suggestions.join(", "))
                };
                QueryResponse::failed(code, format!("Origin stop '{origin}' not found.{hint}"))
            }
            QueryOutcome::DestinationUnresolved {
                destination,
                suggestions,
            } => {
                let hint = if suggestions.is_empty() {
                    " Use the route or stop list to see available destinations.".to_string()
                } else {
                    format!(" Did you mean one of these? {}", suggestions.join(", "))
                };
                QueryResponse::failed(
                    code,
                    format!("Destination '{destination}' not found as route or stop.{hint}"),
                )
            }
            QueryOutcome::NoActiveService {
                context,
                network_idle: true,
            } => QueryResponse::failed(
                code,
                format!("No service available on {}.", long_date(context.at)),
            ),
            QueryOutcome::NoActiveService { context, .. } => {
                let message = match context.matched {
                    DestinationMatch::Route => format!(
                        "No active buses for route '{}' on {}.",
                        context.destination,
                        long_date(context.at)
                    ),
                    DestinationMatch::Stop => format!(
                        "No active buses from {} to {} on {}.",
                        context.origin,
                        context.destination,
                        long_date(context.at)
                    ),
                };
                QueryResponse::failed(code, message)
            }
            QueryOutcome::NoDepartureFromOrigin { context } => {
                let message = match context.matched {
                    DestinationMatch::Route => format!(
                        "No departures found from {} for route '{}'.",
                        context.origin, context.destination
                    ),
                    DestinationMatch::Stop => format!(
                        "No departures found from {} to {}.",
                        context.origin, context.destination
                    ),
                };
                QueryResponse::failed(code, message)
            }
            QueryOutcome::NoDirectRoute { context } => QueryResponse::failed(
                code,
                format!(
                    "No direct routes found from {} to {}. You may need to transfer.",
                    context.origin, context.destination
                ),
            ),
            QueryOutcome::NoMoreDeparturesToday { context } => {
                QueryResponse::failed(code, no_more_today(context))
            }
            QueryOutcome::Unavailable => {
                QueryResponse::failed(code, self.unavailable_message())
            }
        }
    }

    /// Render the stop listing.
    pub fn stops(&self, names: &[String]) -> QueryResponse {
        self.listing(
            "stops",
            names,
            "Note: Stop names are case-insensitive and partial names such as 'DART' also match.",
        )
    }

    /// Render the route listing.
    pub fn routes(&self, names: &[String]) -> QueryResponse {
        self.listing(
            "routes",
            names,
            "Note: Use these route names as destinations when asking for next departures.",
        )
    }

    fn listing(&self, what: &str, names: &[String], note: &str) -> QueryResponse {
        if names.is_empty() {
            return QueryResponse::failed(
                outcome_name(&QueryOutcome::Unavailable),
                self.unavailable_message(),
            );
        }
        let bullets: Vec<String> = names.iter().map(|n| format!("• {n}")).collect();
        QueryResponse::ok(format!(
            "Available {} bus {what}:\n{}\n\n{note}",
            self.agency,
            bullets.join("\n")
        ))
    }

    fn unavailable_message(&self) -> String {
        format!("{} schedule data is not available right now.", self.agency)
    }
}

fn no_more_today(context: &QueryContext) -> String {
    format!(
        "No more buses today from {} to {}.",
        context.origin, context.destination
    )
}

/// e.g. "Wednesday, January 01, 2025".
fn long_date(at: NaiveDateTime) -> String {
    at.format("%A, %B %d, %Y").to_string()
}
