//! Data transfer objects for web responses.

use serde::Serialize;

use crate::sensors::{DepartureSensor, StopSensors};

/// All sensors, grouped under the integration name.
#[derive(Debug, Serialize)]
pub struct SensorsResponse {
    pub name: String,
    pub sensors: Vec<DepartureSensor>,
}

/// One configured stop.
#[derive(Debug, Serialize)]
pub struct StopSummary {
    /// Identifier scheme: "id", "num" or "group"
    pub kind: &'static str,

    /// Identifier value
    pub value: u64,

    /// Resolved stop name
    pub stop_name: String,

    /// Number of sensors of this stop
    pub sensors: usize,

    /// Number of sensors currently showing a departure
    pub available: usize,
}

impl From<&StopSensors> for StopSummary {
    fn from(stop: &StopSensors) -> Self {
        Self {
            kind: stop.query().kind().label(),
            value: stop.query().value(),
            stop_name: stop.stop_name().to_string(),
            sensors: stop.sensors().len(),
            available: stop.sensors().iter().filter(|s| s.available).count(),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
