//! Feed client error types.

/// Errors from the HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Every attempt timed out
    #[error("request to {url} timed out after {attempts} attempts")]
    Timeout { url: String, attempts: u32 },

    /// Connection or protocol failure other than a timeout
    #[error("network error for {url}: {details}")]
    Network { url: String, details: String },

    /// Non-OK status, or OK with an empty body
    #[error("bad response from {url}: status {status}")]
    BadResponse { url: String, status: u16 },
}

/// Errors from parsing a timetable document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The body is not well-formed XML
    #[error("malformed timetable XML: {0}")]
    Malformed(String),

    /// The root element has no stop element
    #[error("timetable has no stop element")]
    MissingStop,
}

/// Failure of one fetch+parse cycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Errors from resolving a stop's name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// The feed answered but does not know the stop
    #[error("stop {0} not found")]
    NotFound(String),

    /// The feed could not be fetched or parsed
    #[error("could not resolve stop: {0}")]
    Upstream(FeedError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FetchError::Timeout {
            url: "http://x/a".into(),
            attempts: 3,
        };
        assert_eq!(err.to_string(), "request to http://x/a timed out after 3 attempts");

        let err = FetchError::BadResponse {
            url: "http://x/a".into(),
            status: 503,
        };
        assert_eq!(err.to_string(), "bad response from http://x/a: status 503");

        let err = ParseError::MissingStop;
        assert_eq!(err.to_string(), "timetable has no stop element");

        let err = ResolutionError::NotFound("group=5".into());
        assert_eq!(err.to_string(), "stop group=5 not found");
    }

    #[test]
    fn feed_error_is_transparent() {
        let err: FeedError = ParseError::Malformed("unexpected end of stream".into()).into();
        assert_eq!(
            err.to_string(),
            "malformed timetable XML: unexpected end of stream"
        );
    }
}
