//! Departure and snapshot types.

use serde::Serialize;

/// Placeholder for a line or direction the feed did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for a departure with no countdown text.
pub const UNKNOWN_ETA: &str = "Unknown";

/// Alert text used when the stop carries no `ds` attribute.
pub const NO_ALERT: &str = " ";

/// One predicted departure of a line/direction pair from a stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Departure {
    /// Line number as shown on the vehicle (e.g. "12", "N3").
    pub line: String,

    /// Terminus the vehicle is heading to.
    pub direction: String,

    /// Upstream countdown text, verbatim (e.g. "3 min", "<1min", "14:05").
    pub eta_text: String,

    /// Vehicle is low-floor.
    pub low_floor: bool,

    /// Vehicle is air-conditioned.
    pub air_conditioned: bool,
}

/// The parsed result of one upstream fetch for one stop.
///
/// Snapshots are never cached or merged; each fetch produces a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopSnapshot {
    /// Stop name as reported by the feed.
    pub stop_name: String,

    /// Server timestamp from the document root, empty if absent.
    pub server_time: String,

    /// Alert text for the stop; a single space when absent.
    pub alert: String,

    /// Departures in document order.
    pub departures: Vec<Departure>,
}
