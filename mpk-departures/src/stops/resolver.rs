//! Stop name resolution.

use tracing::info;

use crate::domain::StopQuery;
use crate::feed::{FeedClient, FeedError, ParseError, ResolutionError};

/// Resolve a stop query to the stop's canonical name.
///
/// Meant to be called once per stop at setup, never on the refresh cadence.
/// A document without a stop element, or with a nameless one, means the
/// stop does not exist.
pub fn resolve_name(client: &FeedClient, query: &StopQuery) -> Result<String, ResolutionError> {
    let result = match client.snapshot(query) {
        Ok(snapshot) if snapshot.stop_name.trim().is_empty() => {
            Err(ResolutionError::NotFound(query.to_string()))
        }
        Ok(snapshot) => Ok(snapshot.stop_name),
        Err(FeedError::Parse(ParseError::MissingStop)) => {
            Err(ResolutionError::NotFound(query.to_string()))
        }
        Err(e) => Err(ResolutionError::Upstream(e)),
    };

    match &result {
        Ok(name) => info!(%query, name = %name, "stop resolved"),
        // The inner cause, not the wrapper, so this dedupes against the
        // transport's own report of the same fetch error.
        Err(ResolutionError::Upstream(cause)) => {
            client.reporter().report(&cause.to_string());
        }
        Err(not_found) => {
            client.reporter().report(&not_found.to_string());
        }
    }

    result
}
