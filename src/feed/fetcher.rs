use crate::feed::item::{NewsItem, NormalizePolicy, DEFAULT_ITEMS_PER_SOURCE};
use crate::feed::parser::parse_entries;
use crate::feed::registry::Source;
use chrono::Local;
use futures::stream::{self, StreamExt};
use reqwest::redirect::Policy;
use std::time::Duration;
use thiserror::Error;

const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of sources fetched at the same time.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 4;

/// Errors that can occur while retrieving and parsing a feed.
///
/// Every variant is handled the same way by [`fetch_source`]: the source's
/// section shows a warning and the other sources are unaffected.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[source] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Body could not be parsed as RSS or Atom
    #[error("Parse error: {0}")]
    Parse(String),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(e)
        }
    }
}

/// Knobs shared by every fetch of a session.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Maximum number of items kept per source.
    pub limit: usize,
    /// Upper bound on simultaneous source fetches. 1 fetches strictly in order.
    pub max_concurrent: usize,
    pub policy: NormalizePolicy,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            limit: DEFAULT_ITEMS_PER_SOURCE,
            max_concurrent: DEFAULT_MAX_CONCURRENT_FETCHES,
            policy: NormalizePolicy::default(),
        }
    }
}

/// Outcome of fetching one source, as consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded(Vec<NewsItem>),
    /// The fetch failed; carries the error message for display.
    Failed(String),
}

impl FetchOutcome {
    /// Items of a successful fetch; empty on failure.
    pub fn items(&self) -> &[NewsItem] {
        match self {
            FetchOutcome::Loaded(items) => items,
            FetchOutcome::Failed(_) => &[],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }
}

/// A source paired with the outcome of its fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub source: Source,
    pub outcome: FetchOutcome,
}

/// Create a redirect policy with loop detection and limited hops.
///
/// - Limits redirects to 3 hops maximum
/// - Detects redirect loops (same URL appearing twice in chain)
/// - Logs redirect chain for debugging
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        for prev in attempt.previous() {
            if prev.as_str() == url.as_str() {
                return attempt.error("Redirect loop detected");
            }
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

/// Build the HTTP client shared by all fetches.
///
/// `timeout` bounds each request end to end (connect, headers and body).
pub fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .redirect(create_redirect_policy())
        .user_agent(concat!("radar/", env!("CARGO_PKG_VERSION")))
        .pool_idle_timeout(Duration::from_secs(30))
        .timeout(timeout)
        .build()
}

/// Retrieve the feed at `url` and return up to `limit` normalized items.
///
/// Items keep the feed's order. Fewer than `limit` entries in the feed means
/// fewer items; the result is never padded. Each call performs one request;
/// nothing is cached and nothing is retried.
///
/// # Errors
///
/// - [`FetchError::Network`] - Connection, DNS or TLS errors
/// - [`FetchError::Timeout`] - Request exceeded the client's timeout
/// - [`FetchError::HttpStatus`] - Non-2xx HTTP response
/// - [`FetchError::ResponseTooLarge`] - Response exceeded 10MB
/// - [`FetchError::IncompleteResponse`] - Body shorter than Content-Length
/// - [`FetchError::Parse`] - Not a valid RSS/Atom document
pub async fn fetch_items(
    client: &reqwest::Client,
    url: &str,
    limit: usize,
    policy: &NormalizePolicy,
) -> Result<Vec<NewsItem>, FetchError> {
    if limit == 0 {
        return Ok(Vec::new());
    }

    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    let bytes = read_limited_bytes(response, MAX_FEED_SIZE).await?;

    let entries = parse_entries(&bytes, limit).map_err(|e| FetchError::Parse(e.to_string()))?;

    let now = Local::now();
    Ok(entries
        .into_iter()
        .map(|entry| policy.apply(entry, now))
        .collect())
}

/// Fetch one source, absorbing any failure into the report.
///
/// This is the failure boundary: the returned report always exists, and a
/// failed fetch is logged and turned into [`FetchOutcome::Failed`].
pub async fn fetch_source(
    client: &reqwest::Client,
    source: &Source,
    settings: &FetchSettings,
) -> SourceReport {
    let outcome = match fetch_items(client, &source.url, settings.limit, &settings.policy).await {
        Ok(items) => {
            tracing::debug!(
                source = %source.label,
                items = items.len(),
                "Fetched source"
            );
            FetchOutcome::Loaded(items)
        }
        Err(e) => {
            tracing::warn!(
                source = %source.label,
                url = %source.url,
                error = %e,
                "Failed to load feed"
            );
            FetchOutcome::Failed(e.to_string())
        }
    };

    SourceReport {
        source: source.clone(),
        outcome,
    }
}

/// Fetch several sources, returning one report per source in input order.
///
/// Up to `settings.max_concurrent` requests are in flight at once. A failing
/// source only affects its own report.
pub async fn fetch_selected(
    client: &reqwest::Client,
    sources: &[Source],
    settings: &FetchSettings,
) -> Vec<SourceReport> {
    stream::iter(sources)
        .map(|source| fetch_source(client, source, settings))
        .buffered(settings.max_concurrent.max(1))
        .collect()
        .await
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Capture Content-Length for completeness check
    let expected_length = response.content_length();

    // Fast path: check Content-Length header
    if let Some(len) = expected_length {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VALID_RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>T</title>
    <item><title>Test</title><link>https://example.com/test</link></item>
</channel></rss>"#;

    fn client() -> reqwest::Client {
        build_client(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(VALID_RSS)
                    .insert_header("Content-Type", "application/xml"),
            )
            .mount(&mock_server)
            .await;

        let url = format!("{}/feed", mock_server.uri());
        let items = fetch_items(&client(), &url, 8, &NormalizePolicy::default())
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Test");
    }

    #[tokio::test]
    async fn test_fetch_404_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let url = format!("{}/feed", mock_server.uri());
        let result = fetch_items(&client(), &url, 8, &NormalizePolicy::default()).await;
        match result {
            Err(FetchError::HttpStatus(404)) => {}
            other => panic!("Expected HttpStatus(404), got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/feed", mock_server.uri());
        let result = fetch_items(&client(), &url, 8, &NormalizePolicy::default()).await;
        assert!(matches!(result, Err(FetchError::HttpStatus(503))));
    }

    #[tokio::test]
    async fn test_malformed_feed_parse_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<not valid xml"))
            .mount(&mock_server)
            .await;

        let url = format!("{}/feed", mock_server.uri());
        let result = fetch_items(&client(), &url, 8, &NormalizePolicy::default()).await;
        match result {
            Err(FetchError::Parse(_)) => {}
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(VALID_RSS)
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let client = build_client(Duration::from_millis(200)).unwrap();
        let url = format!("{}/feed", mock_server.uri());
        let result = fetch_items(&client, &url, 8, &NormalizePolicy::default()).await;
        assert!(matches!(result, Err(FetchError::Timeout)), "{:?}", result);
    }

    #[tokio::test]
    async fn test_zero_limit_makes_no_request() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(VALID_RSS))
            .expect(0)
            .mount(&mock_server)
            .await;

        let url = format!("{}/feed", mock_server.uri());
        let items = fetch_items(&client(), &url, 0, &NormalizePolicy::default())
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_repeated_calls_refetch() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(VALID_RSS))
            .expect(2)
            .mount(&mock_server)
            .await;

        let url = format!("{}/feed", mock_server.uri());
        let client = client();
        let policy = NormalizePolicy::default();
        fetch_items(&client, &url, 8, &policy).await.unwrap();
        fetch_items(&client, &url, 8, &policy).await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_source_absorbs_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let source = Source::new("Broken", format!("{}/feed", mock_server.uri()));
        let report = fetch_source(&client(), &source, &FetchSettings::default()).await;
        assert_eq!(report.source, source);
        assert!(report.outcome.is_failed());
        assert!(report.outcome.items().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_selected_preserves_order_and_isolates_failures() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(VALID_RSS)
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/fast"))
            .respond_with(ResponseTemplate::new(200).set_body_string(VALID_RSS))
            .mount(&mock_server)
            .await;

        let sources = vec![
            Source::new("slow", format!("{}/slow", mock_server.uri())),
            Source::new("broken", format!("{}/broken", mock_server.uri())),
            Source::new("fast", format!("{}/fast", mock_server.uri())),
        ];

        for max_concurrent in [1, 3] {
            let settings = FetchSettings {
                max_concurrent,
                ..Default::default()
            };
            let reports = fetch_selected(&client(), &sources, &settings).await;
            let labels: Vec<&str> = reports.iter().map(|r| r.source.label.as_str()).collect();
            assert_eq!(labels, vec!["slow", "broken", "fast"]);
            assert_eq!(reports[0].outcome.items().len(), 1);
            assert!(reports[1].outcome.is_failed());
            assert_eq!(reports[2].outcome.items().len(), 1);
        }
    }
}
