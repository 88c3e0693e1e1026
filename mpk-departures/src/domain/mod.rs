//! Domain types for the departures feed.
//!
//! A [`StopQuery`] can only be built with exactly one identifier, so code
//! receiving one never has to re-check the configuration.

mod departure;
mod query;

pub use departure::{Departure, NO_ALERT, NOT_AVAILABLE, StopSnapshot, UNKNOWN_ETA};
pub use query::{ConfigurationError, StopKind, StopQuery};
