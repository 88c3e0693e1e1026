//! Timetable HTTP transport.
//!
//! Issues one blocking GET per fetch, retrying only on timeouts. Every
//! failure is passed to the shared [`ErrorReporter`] before it is returned.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::REFERER;
use tracing::{debug, warn};

use crate::domain::{StopQuery, StopSnapshot};

use super::error::{FeedError, FetchError};
use super::parse::parse_snapshot;
use super::reporter::ErrorReporter;

/// Default base URL of the MPK Łódź timetable service.
pub const DEFAULT_BASE_URL: &str = "http://rozklady.lodz.pl";

/// Default per-attempt request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of attempts before giving up on a timing-out request.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default pause between two attempts.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Base URL for the API (defaults to the production service)
    pub base_url: String,
    /// Per-attempt request timeout
    pub timeout: Duration,
    /// Total attempts on timeout, including the first one
    pub max_attempts: u32,
    /// Pause between attempts
    pub retry_delay: Duration,
    /// Honour `HTTP_PROXY`-style environment variables
    pub use_system_proxy: bool,
}

impl FeedConfig {
    /// Create a config pointing at the production service.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            use_system_proxy: true,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the attempt count. Values below 1 are treated as 1.
    pub fn with_max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n.max(1);
        self
    }

    /// Set the pause between attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Connect directly, ignoring proxy environment variables.
    pub fn without_system_proxy(mut self) -> Self {
        self.use_system_proxy = false;
        self
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a single attempt that did not produce a body.
enum AttemptError {
    TimedOut,
    Failed(FetchError),
}

/// Blocking client for the timetable endpoint.
///
/// Must not be created or dropped inside an async context; run it on a
/// plain thread or under `spawn_blocking`.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::blocking::Client,
    base_url: String,
    max_attempts: u32,
    retry_delay: Duration,
    reporter: Arc<ErrorReporter>,
}

impl FeedClient {
    /// Create a client with the given configuration and shared reporter.
    pub fn new(config: FeedConfig, reporter: Arc<ErrorReporter>) -> reqwest::Result<Self> {
        let mut builder = reqwest::blocking::Client::builder().timeout(config.timeout);
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_attempts: config.max_attempts.max(1),
            retry_delay: config.retry_delay,
            reporter,
        })
    }

    /// The reporter this client routes failures through.
    pub fn reporter(&self) -> &ErrorReporter {
        &self.reporter
    }

    /// Full request URL for a query.
    ///
    /// The group endpoint really is spelled `getTimeTableReal`.
    pub fn url_for(&self, query: &StopQuery) -> String {
        match query {
            StopQuery::ById(id) => {
                format!("{}/Home/GetTimeTableReal?busStopId={id}", self.base_url)
            }
            StopQuery::ByNumber(num) => {
                format!("{}/Home/GetTimeTableReal?busStopNum={num}", self.base_url)
            }
            StopQuery::ByGroup(group) => {
                format!("{}/Home/getTimeTableReal?busStopGroupId={group}", self.base_url)
            }
        }
    }

    /// Fetch the raw timetable document for a stop.
    pub fn fetch(&self, query: &StopQuery) -> Result<Vec<u8>, FetchError> {
        let url = self.url_for(query);
        let result = self.fetch_url(&url);

        if let Err(e) = &result {
            self.reporter.report(&e.to_string());
        }

        result
    }

    /// Fetch and parse the timetable for a stop.
    ///
    /// Fetch failures are already reported; parse failures are left to the
    /// caller.
    pub fn snapshot(&self, query: &StopQuery) -> Result<StopSnapshot, FeedError> {
        let body = self.fetch(query)?;
        Ok(parse_snapshot(&body, &self.reporter)?)
    }

    fn fetch_url(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        for attempt in 1..=self.max_attempts {
            match self.attempt(url) {
                Ok(body) => {
                    debug!(url, attempt, bytes = body.len(), "timetable fetched");
                    return Ok(body);
                }
                Err(AttemptError::Failed(e)) => return Err(e),
                Err(AttemptError::TimedOut) => {
                    if attempt < self.max_attempts {
                        warn!(
                            url,
                            attempt,
                            max_attempts = self.max_attempts,
                            "request timed out, retrying"
                        );
                        std::thread::sleep(self.retry_delay);
                    }
                }
            }
        }

        Err(FetchError::Timeout {
            url: url.to_string(),
            attempts: self.max_attempts,
        })
    }

    fn attempt(&self, url: &str) -> Result<Vec<u8>, AttemptError> {
        let response = self
            .http
            .get(url)
            .header(REFERER, url)
            .send()
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AttemptError::Failed(FetchError::BadResponse {
                url: url.to_string(),
                status: status.as_u16(),
            }));
        }

        let body = response.bytes().map_err(|e| classify(url, e))?;
        if body.is_empty() {
            return Err(AttemptError::Failed(FetchError::BadResponse {
                url: url.to_string(),
                status: status.as_u16(),
            }));
        }

        Ok(body.to_vec())
    }
}

fn classify(url: &str, err: reqwest::Error) -> AttemptError {
    if err.is_timeout() {
        AttemptError::TimedOut
    } else {
        AttemptError::Failed(FetchError::Network {
            url: url.to_string(),
            details: err.to_string(),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::test_server::{response, serve};
    use super::*;

    fn client(base_url: &str, reporter: Arc<ErrorReporter>) -> FeedClient {
        let config = FeedConfig::new()
            .with_base_url(base_url)
            .with_timeout(Duration::from_millis(200))
            .with_max_attempts(3)
            .with_retry_delay(Duration::from_millis(10))
            .without_system_proxy();
        FeedClient::new(config, reporter).unwrap()
    }

    #[test]
    fn config_builder() {
        let config = FeedConfig::new()
            .with_base_url("http://localhost:8080")
            .with_timeout(Duration::from_secs(5))
            .with_max_attempts(0)
            .with_retry_delay(Duration::from_millis(500));

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_attempts, 1);
        assert_eq!(config.retry_delay, Duration::from_millis(500));
    }

    #[test]
    fn config_defaults() {
        let config = FeedConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.retry_delay, DEFAULT_RETRY_DELAY);
        assert!(config.use_system_proxy);
    }

    #[test]
    fn urls_per_query_kind() {
        let client = FeedClient::new(FeedConfig::new(), Arc::default()).unwrap();

        assert_eq!(
            client.url_for(&StopQuery::ById(123)),
            "http://rozklady.lodz.pl/Home/GetTimeTableReal?busStopId=123"
        );
        assert_eq!(
            client.url_for(&StopQuery::ByNumber(1580)),
            "http://rozklady.lodz.pl/Home/GetTimeTableReal?busStopNum=1580"
        );
        assert_eq!(
            client.url_for(&StopQuery::ByGroup(77)),
            "http://rozklady.lodz.pl/Home/getTimeTableReal?busStopGroupId=77"
        );
    }

    #[test]
    fn trailing_slash_in_base_url_is_ignored() {
        let config = FeedConfig::new().with_base_url("http://localhost:9000/");
        let client = FeedClient::new(config, Arc::default()).unwrap();

        assert_eq!(
            client.url_for(&StopQuery::ById(1)),
            "http://localhost:9000/Home/GetTimeTableReal?busStopId=1"
        );
    }

    #[test]
    fn sends_referer_equal_to_url() {
        for query in [
            StopQuery::ById(5),
            StopQuery::ByNumber(6),
            StopQuery::ByGroup(7),
        ] {
            let (base_url, server) = serve(1, Some(response("200 OK", "<R/>")));
            let client = client(&base_url, Arc::default());
            let url = client.url_for(&query);

            let body = client.fetch(&query).unwrap();
            assert_eq!(body, b"<R/>");

            let requests = server.join().unwrap();
            let head = requests[0].to_ascii_lowercase();
            let path = url.strip_prefix(&base_url).unwrap();
            assert!(requests[0].starts_with(&format!("GET {path} HTTP/1.1\r\n")));
            assert!(head.contains(&format!("\r\nreferer: {}\r\n", url.to_ascii_lowercase())));
        }
    }

    #[test]
    fn retries_timeouts_then_gives_up() {
        let (base_url, server) = serve(3, None);
        let reporter = Arc::new(ErrorReporter::default());
        let client = client(&base_url, Arc::clone(&reporter));

        let err = client.fetch(&StopQuery::ById(1)).unwrap_err();

        assert!(matches!(err, FetchError::Timeout { attempts: 3, .. }));
        assert_eq!(server.join().unwrap().len(), 3);
        assert_eq!(reporter.emitted(), 1);
    }

    #[test]
    fn non_ok_status_is_bad_response_without_retry() {
        let (base_url, server) = serve(1, Some(response("503 Service Unavailable", "busy")));
        let reporter = Arc::new(ErrorReporter::default());
        let client = client(&base_url, Arc::clone(&reporter));

        let err = client.fetch(&StopQuery::ByNumber(2)).unwrap_err();

        assert!(matches!(err, FetchError::BadResponse { status: 503, .. }));
        assert_eq!(server.join().unwrap().len(), 1);
        assert_eq!(reporter.emitted(), 1);
    }

    #[test]
    fn empty_body_is_bad_response() {
        let (base_url, server) = serve(1, Some(response("200 OK", "")));
        let client = client(&base_url, Arc::default());

        let err = client.fetch(&StopQuery::ByGroup(3)).unwrap_err();

        assert!(matches!(err, FetchError::BadResponse { status: 200, .. }));
        server.join().unwrap();
    }

    #[test]
    fn refused_connection_is_network_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let reporter = Arc::new(ErrorReporter::default());
        let client = client(&format!("http://127.0.0.1:{port}"), Arc::clone(&reporter));

        let err = client.fetch(&StopQuery::ById(4)).unwrap_err();

        assert!(matches!(err, FetchError::Network { .. }));
        assert_eq!(reporter.emitted(), 1);
    }
}
