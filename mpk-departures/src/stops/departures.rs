//! Departure feed for the refresh cadence.
//!
//! Both functions here never fail: any error is reported through the
//! client's reporter and the result degrades to "no data". Each call is a
//! fresh upstream round-trip; nothing is cached between calls.

use tracing::debug;

use crate::domain::{Departure, StopQuery, StopSnapshot};
use crate::feed::FeedClient;

/// Fetch the full snapshot for a stop, or `None` if the fetch failed.
pub fn fetch_snapshot(client: &FeedClient, query: &StopQuery) -> Option<StopSnapshot> {
    match client.snapshot(query) {
        Ok(snapshot) => {
            debug!(
                %query,
                departures = snapshot.departures.len(),
                server_time = %snapshot.server_time,
                "snapshot fetched"
            );
            Some(snapshot)
        }
        Err(e) => {
            client.reporter().report(&e.to_string());
            None
        }
    }
}

/// Fetch the current departures for a stop, in upstream order.
///
/// Returns an empty list on failure. The list is neither filtered nor
/// truncated.
pub fn fetch_departures(client: &FeedClient, query: &StopQuery) -> Vec<Departure> {
    fetch_snapshot(client, query)
        .map(|snapshot| snapshot.departures)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::feed::test_server::{response, serve};
    use crate::feed::{ErrorReporter, FeedConfig};

    const BOARD: &str = r#"<Schedules time="21:37">
  <Stop name="Plac Wolności" ds="Objazd linii 12">
    <Day>
      <R nr="12" dir="Chojny" vuw="NK"><S t="3 min"/></R>
      <R nr="4" dir="Helenówek" vuw="N"><S t="&lt;1min"/></R>
      <Msg/>
      <R nr="N3" dir="Retkinia"><S t="23:50"/></R>
    </Day>
  </Stop>
</Schedules>"#;

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
    fn departures_in_upstream_order() {
        let (base_url, server) = serve(1, Some(response("200 OK", BOARD)));
        let client = client(&base_url, Arc::default());

        let departures = fetch_departures(&client, &StopQuery::ByGroup(81));

        let summary: Vec<_> = departures
            .iter()
            .map(|d| (d.line.as_str(), d.direction.as_str(), d.eta_text.as_str()))
            .collect();
        assert_eq!(
            summary,
            [
                ("12", "Chojny", "3 min"),
                ("4", "Helenówek", "<1min"),
                ("N3", "Retkinia", "23:50"),
            ]
        );
        server.join().unwrap();
    }

    #[test]
    fn snapshot_carries_time_and_alert() {
        let (base_url, server) = serve(1, Some(response("200 OK", BOARD)));
        let client = client(&base_url, Arc::default());

        let snapshot = fetch_snapshot(&client, &StopQuery::ById(1)).unwrap();

        assert_eq!(snapshot.server_time, "21:37");
        assert_eq!(snapshot.alert, "Objazd linii 12");
        server.join().unwrap();
    }

    #[test]
    fn every_attempt_timing_out_yields_empty_and_one_report() {
        let (base_url, server) = serve(3, None);
        let reporter = Arc::new(ErrorReporter::default());
        let client = client(&base_url, Arc::clone(&reporter));

        let departures = fetch_departures(&client, &StopQuery::ByNumber(7));

        assert!(departures.is_empty());
        assert_eq!(server.join().unwrap().len(), 3);
        assert_eq!(reporter.emitted(), 1);
    }

    #[test]
    fn malformed_document_yields_empty() {
        let (base_url, server) = serve(1, Some(response("200 OK", "<Schedules>")));
        let reporter = Arc::new(ErrorReporter::default());
        let client = client(&base_url, Arc::clone(&reporter));

        assert!(fetch_snapshot(&client, &StopQuery::ById(5)).is_none());
        assert_eq!(reporter.emitted(), 1);
        server.join().unwrap();
    }

    #[test]
    fn same_failure_twice_logs_once() {
        let (base_url, server) = serve(2, Some(response("404 Not Found", "")));
        let reporter = Arc::new(ErrorReporter::default());
        let client = client(&base_url, Arc::clone(&reporter));

        assert!(fetch_departures(&client, &StopQuery::ById(5)).is_empty());
        assert!(fetch_departures(&client, &StopQuery::ById(5)).is_empty());

        assert_eq!(reporter.emitted(), 1);
        server.join().unwrap();
    }
}
