//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::sensors::StopSensors;

/// Shared application state.
///
/// The refresh loops write into `stops`; the handlers only read.
#[derive(Clone)]
pub struct AppState {
    /// Display name of the integration
    pub name: Arc<str>,

    /// Sensors of every stop that was set up
    pub stops: Arc<RwLock<Vec<StopSensors>>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(name: &str, stops: Vec<StopSensors>) -> Self {
        Self {
            name: Arc::from(name),
            stops: Arc::new(RwLock::new(stops)),
        }
    }
}
