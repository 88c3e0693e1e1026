//! Application configuration.
//!
//! Read once at startup from a JSON file:
//!
//! ```json
//! {
//!   "name": "MPK Łódź",
//!   "scan_interval_secs": 60,
//!   "stops": [
//!     { "num": 1580 },
//!     { "group": 81, "lines": "12, 4", "directions": ["Chojny"] }
//!   ]
//! }
//! ```
//!
//! Every field except `stops` has a default.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::domain::{ConfigurationError, StopQuery};
use crate::feed::{DEFAULT_BASE_URL, DEFAULT_COOLDOWN, FeedConfig};
use crate::stops::{DepartureFilter, split_csv};

/// Errors from loading the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not valid configuration JSON
    #[error("invalid config file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Display name of the integration.
    pub name: String,

    /// Base URL of the timetable service.
    pub base_url: String,

    /// Address the HTTP surface listens on.
    pub listen: SocketAddr,

    /// Seconds between two refreshes of the same stop.
    pub scan_interval_secs: u64,

    /// Number of departure sensors created per stop.
    pub sensors_per_stop: usize,

    /// Upper bound on fetches in flight across all stops.
    pub max_concurrent_fetches: usize,

    /// Per-attempt request timeout (seconds).
    pub timeout_secs: u64,

    /// Attempts per fetch when requests time out.
    pub max_attempts: u32,

    /// Pause between attempts (milliseconds).
    pub retry_delay_ms: u64,

    /// Minimum seconds between two logs of the same error.
    pub error_cooldown_secs: u64,

    /// Stops to watch.
    pub stops: Vec<StopConfig>,
}

impl AppConfig {
    /// Load the configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&contents).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse the configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Feed client settings derived from this configuration.
    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig::new()
            .with_base_url(&self.base_url)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_max_attempts(self.max_attempts)
            .with_retry_delay(Duration::from_millis(self.retry_delay_ms))
    }

    /// Returns the refresh interval as a Duration.
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs.max(1))
    }

    /// Returns the error log cooldown as a Duration.
    pub fn error_cooldown(&self) -> Duration {
        Duration::from_secs(self.error_cooldown_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "MPK Łódź".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            listen: SocketAddr::from(([127, 0, 0, 1], 3000)),
            scan_interval_secs: 60,
            sensors_per_stop: 10,
            max_concurrent_fetches: 4,
            timeout_secs: 10,
            max_attempts: 3,
            retry_delay_ms: 2000,
            error_cooldown_secs: DEFAULT_COOLDOWN.as_secs(),
            stops: Vec::new(),
        }
    }
}

/// Configuration of one stop.
///
/// Exactly one of `id`, `num` and `group` must be non-zero; this is checked
/// by [`StopConfig::query`], not at load time, so one bad stop does not
/// prevent the others from starting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StopConfig {
    pub id: u64,
    pub num: u64,
    pub group: u64,

    /// Optional line allow-list, as a JSON list or a comma-separated string.
    #[serde(deserialize_with = "list_or_csv")]
    pub lines: Vec<String>,

    /// Optional direction allow-list, as a JSON list or a comma-separated string.
    #[serde(deserialize_with = "list_or_csv")]
    pub directions: Vec<String>,
}

impl StopConfig {
    /// The validated query for this stop.
    pub fn query(&self) -> Result<StopQuery, ConfigurationError> {
        StopQuery::from_identifiers(self.id, self.num, self.group)
    }

    /// The line/direction filter for this stop.
    pub fn filter(&self) -> DepartureFilter {
        DepartureFilter::new(self.lines.clone(), self.directions.clone())
    }
}

fn list_or_csv<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrCsv {
        List(Vec<String>),
        Csv(String),
    }

    Ok(match ListOrCsv::deserialize(deserializer)? {
        ListOrCsv::List(entries) => entries
            .into_iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect(),
        ListOrCsv::Csv(s) => split_csv(&s),
    })
}
