//! MPK Łódź timetable feed client.
//!
//! This module provides a blocking HTTP client for the `rozklady.lodz.pl`
//! real-time timetable endpoint and a parser for its XML documents.
//!
//! Key characteristics of the feed:
//! - A stop can be addressed by id, by number or by stop group, each through
//!   its own endpoint path and query parameter
//! - The server insists on a `referer` header equal to the request URL
//! - Countdown texts ("3 min", "<1min", "14:05") are free-form and passed
//!   through untouched
//! - Attributes and elements go missing without notice, so every field has a
//!   default and a sparse entry still yields a departure

mod client;
mod error;
mod parse;
mod reporter;

pub use client::{DEFAULT_BASE_URL, FeedClient, FeedConfig};
pub use error::{FeedError, FetchError, ParseError, ResolutionError};
pub use parse::{parse_departure, parse_snapshot};
pub use reporter::{DEFAULT_COOLDOWN, ErrorReporter};

#[cfg(test)]
pub(crate) use client::test_server;
