//! Web layer for the departure server.
//!
//! Provides HTTP endpoints for departure queries, stop and route listings,
//! and timetable reloads.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
