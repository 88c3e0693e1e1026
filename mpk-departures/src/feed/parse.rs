//! Timetable document parsing.
//!
//! The feed is loosely structured: attributes go missing, unrelated
//! elements are interleaved with departures, and the container element is
//! sometimes absent entirely. Every field gets an explicit default here, so
//! extracting a departure from an entry element cannot fail.
//!
//! Document shape:
//!
//! ```text
//! <Schedules time="12:00">
//!   <Stop name="Plac Wolności" ds="alert text">
//!     <Day>
//!       <R nr="12" dir="Chojny" vuw="NK">
//!         <S t="3 min"/>
//!       </R>
//!     </Day>
//!   </Stop>
//! </Schedules>
//! ```

use roxmltree::{Document, Node};

use crate::domain::{Departure, NO_ALERT, NOT_AVAILABLE, StopSnapshot, UNKNOWN_ETA};

use super::error::ParseError;
use super::reporter::ErrorReporter;

/// Tag of the element holding the departure entries.
const CONTAINER_TAG: &str = "Day";

/// Tag of a single departure entry.
const DEPARTURE_TAG: &str = "R";

/// Tag of a departure's schedule sub-element.
const SCHEDULE_TAG: &str = "S";

/// Feature marker for low-floor vehicles.
const LOW_FLOOR_MARKER: char = 'N';

/// Feature marker for air-conditioned vehicles.
const AIR_CONDITIONED_MARKER: char = 'K';

/// Parse a raw timetable document into a snapshot.
///
/// A missing departure container is reported through `reporter` and does
/// not fail the parse.
pub fn parse_snapshot(body: &[u8], reporter: &ErrorReporter) -> Result<StopSnapshot, ParseError> {
    let text = std::str::from_utf8(body).map_err(|e| ParseError::Malformed(e.to_string()))?;
    let doc = Document::parse(text).map_err(|e| ParseError::Malformed(e.to_string()))?;

    let root = doc.root_element();
    let server_time = root.attribute("time").unwrap_or_default().to_string();

    let stop = root.first_element_child().ok_or(ParseError::MissingStop)?;
    let stop_name = stop.attribute("name").unwrap_or_default().to_string();
    let alert = stop.attribute("ds").unwrap_or(NO_ALERT).to_string();

    let departures = match stop.children().find(|n| n.has_tag_name(CONTAINER_TAG)) {
        Some(container) => parse_departures(container),
        None => {
            reporter.report(&format!(
                "stop '{stop_name}' has no <{CONTAINER_TAG}> departure container"
            ));
            Vec::new()
        }
    };

    Ok(StopSnapshot {
        stop_name,
        server_time,
        alert,
        departures,
    })
}

fn parse_departures(container: Node) -> Vec<Departure> {
    container
        .children()
        .filter(|n| n.has_tag_name(DEPARTURE_TAG))
        .map(parse_departure)
        .collect()
}

/// Extract one departure from an entry element.
///
/// `nr` and `dir` are taken verbatim, blank values included; only an absent
/// attribute maps to [`NOT_AVAILABLE`].
pub fn parse_departure(entry: Node) -> Departure {
    let line = entry.attribute("nr").unwrap_or(NOT_AVAILABLE).to_string();
    let direction = entry.attribute("dir").unwrap_or(NOT_AVAILABLE).to_string();

    let features = entry.attribute("vuw").unwrap_or_default();

    let eta_text = entry
        .children()
        .find(|n| n.has_tag_name(SCHEDULE_TAG))
        .and_then(|s| s.attribute("t"))
        .filter(|t| !t.is_empty())
        .unwrap_or(UNKNOWN_ETA)
        .to_string();

    Departure {
        line,
        direction,
        eta_text,
        low_floor: features.contains(LOW_FLOOR_MARKER),
        air_conditioned: features.contains(AIR_CONDITIONED_MARKER),
    }
}
