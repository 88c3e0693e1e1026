//! Departure sensors.
//!
//! Each configured stop gets a fixed number of sensors; sensor `i` shows the
//! `i`-th upcoming departure and goes unavailable when there is none.
//! Sensors are created once at setup and never removed, so a failing
//! upstream only flips them to unavailable.

mod entity;
mod stop;

pub use entity::{AIR_CONDITIONED_ICON, DepartureSensor, ICON, LOW_FLOOR_ICON, SensorAttributes};
pub use stop::{SetupError, StopSensors, setup_all, setup_stop};
