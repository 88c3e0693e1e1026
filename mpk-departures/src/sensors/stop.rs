//! Sensors of one stop, and stop setup.

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::config::{AppConfig, StopConfig};
use crate::domain::{ConfigurationError, StopQuery, StopSnapshot};
use crate::feed::{FeedClient, ResolutionError};
use crate::stops::{DepartureFilter, fetch_snapshot, resolve_name};

use super::entity::DepartureSensor;

/// Why a configured stop was not set up.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

/// The fixed set of departure sensors for one stop.
#[derive(Debug, Clone)]
pub struct StopSensors {
    query: StopQuery,
    stop_name: String,
    filter: DepartureFilter,
    sensors: Vec<DepartureSensor>,
}

impl StopSensors {
    /// Create `count` unavailable sensors for a resolved stop.
    pub fn new(query: StopQuery, stop_name: String, filter: DepartureFilter, count: usize) -> Self {
        let sensors = (0..count)
            .map(|index| DepartureSensor::new(&query, &stop_name, index))
            .collect();

        Self {
            query,
            stop_name,
            filter,
            sensors,
        }
    }

    pub fn query(&self) -> &StopQuery {
        &self.query
    }

    pub fn stop_name(&self) -> &str {
        &self.stop_name
    }

    pub fn sensors(&self) -> &[DepartureSensor] {
        &self.sensors
    }

    /// Apply the result of one refresh to every sensor.
    ///
    /// Sensor `i` shows the `i`-th departure that passes the filter, and is
    /// unavailable when there are fewer. A failed refresh (`None`) makes
    /// every sensor unavailable; the sensors themselves stay.
    ///
    /// Returns the number of available sensors.
    pub fn apply(&mut self, snapshot: Option<StopSnapshot>, now: DateTime<Local>) -> usize {
        let Some(mut snapshot) = snapshot else {
            for sensor in &mut self.sensors {
                sensor.mark_unavailable(now);
            }
            return 0;
        };

        let departures = std::mem::take(&mut snapshot.departures);
        let departures = self.filter.apply(departures);

        for sensor in &mut self.sensors {
            let departure = departures.get(sensor.index);
            sensor.show(departure, &snapshot, &self.stop_name, now);
        }

        self.sensors.iter().filter(|s| s.available).count()
    }

    /// Fetch the stop's departures and apply them. Blocks.
    pub fn refresh(&mut self, client: &FeedClient) -> usize {
        let snapshot = fetch_snapshot(client, &self.query);
        self.apply(snapshot, Local::now())
    }
}

/// Validate, resolve and populate one stop. Blocks.
pub fn setup_stop(
    client: &FeedClient,
    stop: &StopConfig,
    sensors_per_stop: usize,
) -> Result<StopSensors, SetupError> {
    let query = stop.query()?;
    let stop_name = resolve_name(client, &query)?;

    let mut sensors = StopSensors::new(query, stop_name, stop.filter(), sensors_per_stop);
    let available = sensors.refresh(client);
    info!(
        %query,
        stop_name = %sensors.stop_name(),
        sensors = sensors_per_stop,
        available,
        "stop set up"
    );

    Ok(sensors)
}

/// Set up every configured stop, skipping the ones that fail. Blocks.
pub fn setup_all(client: &FeedClient, config: &AppConfig) -> Vec<StopSensors> {
    config
        .stops
        .iter()
        .enumerate()
        .filter_map(|(i, stop)| match setup_stop(client, stop, config.sensors_per_stop) {
            Ok(sensors) => Some(sensors),
            Err(e) => {
                warn!(stop = i, error = %e, "skipping stop");
                None
            }
        })
        .collect()
}
