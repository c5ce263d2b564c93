//! Departure server.
//!
//! Answers "when is the next bus from this stop toward that route or stop?"
//! against a static GTFS timetable, over HTTP.

pub mod cache;
pub mod config;
pub mod domain;
pub mod engine;
pub mod feed;
pub mod planner;
pub mod response;
pub mod schedule;
pub mod timetable;
pub mod web;

#[cfg(test)]
mod fixtures;
