//! A single departure sensor.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::domain::{Departure, StopQuery, StopSnapshot};

/// Icon shown for every departure sensor.
pub const ICON: &str = "mdi:bus-clock";

/// Feature icon for low-floor vehicles.
pub const LOW_FLOOR_ICON: &str = "mdi:wheelchair";

/// Feature icon for air-conditioned vehicles.
pub const AIR_CONDITIONED_ICON: &str = "mdi:snowflake";

/// Attributes published alongside a sensor's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorAttributes {
    pub line: String,
    pub direction: String,
    pub time: String,
    /// Server time of the snapshot the departure came from
    pub current_time: String,
    pub alert: String,
    /// Equipment icons, low-floor first
    pub features: Vec<&'static str>,
    pub stop_name: String,
}

/// The departure at a fixed index of a stop's current list.
#[derive(Debug, Clone, Serialize)]
pub struct DepartureSensor {
    pub unique_id: String,
    pub entity_id: String,
    pub name: String,
    pub icon: &'static str,
    pub index: usize,
    pub available: bool,
    /// Countdown text of the departure, when available
    pub state: Option<String>,
    pub attributes: Option<SensorAttributes>,
    pub last_updated: Option<DateTime<Local>>,
}

impl DepartureSensor {
    /// Create an unavailable sensor for `index` at the given stop.
    pub fn new(query: &StopQuery, stop_name: &str, index: usize) -> Self {
        let kind = query.kind().label();
        let value = query.value();
        let object_id = slugify(&format!("mpk_lodz_{kind}_{value}_{stop_name}_{index}"));

        Self {
            unique_id: format!("mpk_lodz_{kind}_{value}_{index}"),
            entity_id: format!("sensor.{object_id}"),
            name: format!("{stop_name} {index}"),
            icon: ICON,
            index,
            available: false,
            state: None,
            attributes: None,
            last_updated: None,
        }
    }

    /// Show `departure` from `snapshot`, or go unavailable if there is none.
    pub fn show(
        &mut self,
        departure: Option<&Departure>,
        snapshot: &StopSnapshot,
        stop_name: &str,
        now: DateTime<Local>,
    ) {
        match departure {
            Some(departure) => {
                self.available = true;
                self.state = Some(departure.eta_text.clone());
                self.attributes = Some(SensorAttributes {
                    line: departure.line.clone(),
                    direction: departure.direction.clone(),
                    time: departure.eta_text.clone(),
                    current_time: snapshot.server_time.clone(),
                    alert: snapshot.alert.clone(),
                    features: features(departure),
                    stop_name: stop_name.to_string(),
                });
            }
            None => self.clear(),
        }
        self.last_updated = Some(now);
    }

    /// Mark the sensor unavailable after a failed refresh.
    pub fn mark_unavailable(&mut self, now: DateTime<Local>) {
        self.clear();
        self.last_updated = Some(now);
    }

    fn clear(&mut self) {
        self.available = false;
        self.state = None;
        self.attributes = None;
    }
}

/// Lowercase `[a-z0-9_]` form of `text`.
///
/// Polish letters fold to their base letter; every other run of
/// characters outside `[a-z0-9]` becomes a single `_`, and no `_` is left
/// at either end.
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        let c = match c {
            'ą' => 'a',
            'ć' => 'c',
            'ę' => 'e',
            'ł' => 'l',
            'ń' => 'n',
            'ó' => 'o',
            'ś' => 's',
            'ź' | 'ż' => 'z',
            c => c,
        };
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    if slug.ends_with('_') {
        slug.pop();
    }
    slug
}

fn features(departure: &Departure) -> Vec<&'static str> {
    let mut icons = Vec::new();
    if departure.low_floor {
        icons.push(LOW_FLOOR_ICON);
    }
    if departure.air_conditioned {
        icons.push(AIR_CONDITIONED_ICON);
    }
    icons
}
