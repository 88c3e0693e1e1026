//! Line and direction allow-lists.
//!
//! Filtering is a projection over the departure feed's full result and is
//! never applied while parsing.

use serde::{Deserialize, Serialize};

use crate::domain::Departure;

/// Optional allow-lists for lines and directions.
///
/// An empty list places no constraint on that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartureFilter {
    pub lines: Vec<String>,
    pub directions: Vec<String>,
}

impl DepartureFilter {
    /// Create a filter from explicit allow-lists.
    pub fn new(lines: Vec<String>, directions: Vec<String>) -> Self {
        Self { lines, directions }
    }

    /// Create a filter from comma-separated lists such as `"12, 4,N3"`.
    pub fn from_csv(lines: &str, directions: &str) -> Self {
        Self::new(split_csv(lines), split_csv(directions))
    }

    /// True when the filter lets everything through.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.directions.is_empty()
    }

    /// Whether a departure passes both allow-lists.
    pub fn matches(&self, departure: &Departure) -> bool {
        allows(&self.lines, &departure.line) && allows(&self.directions, &departure.direction)
    }

    /// Keep only the matching departures, preserving order.
    pub fn apply(&self, departures: Vec<Departure>) -> Vec<Departure> {
        if self.is_empty() {
            return departures;
        }
        departures.into_iter().filter(|d| self.matches(d)).collect()
    }
}

fn allows(list: &[String], value: &str) -> bool {
    list.is_empty() || list.iter().any(|entry| entry == value)
}

/// Split a comma-separated list, trimming entries and dropping blanks.
pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
