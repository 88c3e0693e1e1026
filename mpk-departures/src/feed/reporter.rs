//! Rate-limited error reporting.
//!
//! A stalled upstream produces the same failure on every refresh of every
//! sensor. The reporter logs each distinct message at most once per
//! cooldown window and silently absorbs the repeats.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use tracing::error;

/// Default cooldown between two emissions of the same message.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(300);

/// Deduplicating error log, keyed by exact message text.
///
/// Construct one per process (or per client) and share it by reference.
/// The whole map sits behind one mutex, so two threads reporting the same
/// message cannot both pass the cooldown check.
#[derive(Debug)]
pub struct ErrorReporter {
    cooldown: Duration,
    last_logged: Mutex<HashMap<String, Instant>>,
    emitted: AtomicUsize,
}

impl ErrorReporter {
    /// Create a reporter with the given cooldown.
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_logged: Mutex::new(HashMap::new()),
            emitted: AtomicUsize::new(0),
        }
    }

    /// Report a failure message.
    ///
    /// Returns `true` if the message was emitted, `false` if it was absorbed
    /// as a repeat within the cooldown window.
    pub fn report(&self, message: &str) -> bool {
        self.report_at(message, Instant::now())
    }

    fn report_at(&self, message: &str, now: Instant) -> bool {
        // A poisoned lock only means another reporter panicked mid-update;
        // the map itself is still usable.
        let mut last_logged = self
            .last_logged
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let due = match last_logged.get(message) {
            None => true,
            Some(&at) => now.saturating_duration_since(at) > self.cooldown,
        };
        if !due {
            return false;
        }

        last_logged.insert(message.to_string(), now);
        drop(last_logged);

        self.emitted.fetch_add(1, Ordering::Relaxed);
        error!("{message}");
        true
    }

    /// Number of messages emitted so far.
    pub fn emitted(&self) -> usize {
        self.emitted.load(Ordering::Relaxed)
    }

    /// The cooldown window.
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}
