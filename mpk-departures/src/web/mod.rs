//! Web layer for the departures sensors.
//!
//! Serves the sensor states as JSON for whatever dashboard polls them.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
