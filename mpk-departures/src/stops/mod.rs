//! Per-stop operations built on the feed client.
//!
//! [`resolve_name`] runs once per stop at setup; [`fetch_departures`] and
//! [`fetch_snapshot`] run on every refresh and never fail.

mod departures;
mod filter;
mod resolver;

pub use departures::{fetch_departures, fetch_snapshot};
pub use filter::{DepartureFilter, split_csv};
pub use resolver::resolve_name;
