//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::time::Duration;
use word_ripple::config::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use word_ripple::crawler::{run_crawl, FetchError, Fetcher, HttpFetcher};
use word_ripple::output::format_markdown_summary;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with the given seeds and depth
fn create_test_config(seeds: Vec<String>, max_depth: u32) -> Config {
    Config {
        seeds,
        crawler: CrawlerConfig {
            max_depth,
            max_concurrent_fetches: 4,
            result_buffer: 8,
            fetch_timeout_ms: 2_000,
            release_claim_on_failure: false,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
        },
        output: OutputConfig::default(),
    }
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_full_crawl_respects_depth() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(format!(
            r#"<html><body><p>Cat dog Cat</p>
            <a href="{}/page1">Page</a>
            <a href="/page2">Page</a>
            </body></html>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html(
            r#"<p>bird bird</p> <a href="/deep">Deeper</a> <a href="/">Home</a>"#.to_string(),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html("<p>fish</p>".to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    // depth 2 is past the limit
    Mock::given(method("GET"))
        .and(path("/deep"))
        .respond_with(html("<p>unreachable</p>".to_string()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/", base_url)], 1);
    let (summary, report) = run_crawl(&config).await.expect("crawl should run");

    assert_eq!(report.seeds, 1);
    assert_eq!(report.fetched, 3);
    assert_eq!(report.failures(), 0);
    assert_eq!(summary.unique_pages(), 3);

    assert_eq!(summary.word_totals["cat"], 2);
    assert_eq!(summary.word_totals["bird"], 2);
    assert_eq!(summary.word_totals.get("unreachable"), None);
    assert_eq!(summary.pages[&format!("{}/page2", base_url)], 1);
    assert_eq!(summary.top_words(1), vec![("bird".to_string(), 2)]);

    let markdown = format_markdown_summary(&summary, &report);
    assert!(markdown.contains("| Fetched | 3 |"));
}

#[tokio::test]
async fn test_failed_page_is_isolated() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<a href="/broken">x</a> <a href="/fine">y</a>"#.to_string(),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/fine"))
        .respond_with(html("<p>still here</p>".to_string()))
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/", base_url)], 1);
    let (summary, report) = run_crawl(&config).await.expect("crawl should run");

    assert_eq!(report.fetched, 2);
    assert_eq!(report.bad_request, 1);
    assert_eq!(summary.unique_pages(), 2);
    assert!(!summary.pages.contains_key(&format!("{}/broken", base_url)));
    assert_eq!(summary.word_totals["still"], 1);
}

#[tokio::test]
async fn test_seed_only_at_depth_zero() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<p>alone</p> <a href="/next">next</a>"#.to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html("<p>skipped</p>".to_string()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/", base_url)], 0);
    let (summary, report) = run_crawl(&config).await.expect("crawl should run");

    assert_eq!(report.fetched, 1);
    assert_eq!(summary.unique_pages(), 1);
    assert_eq!(summary.word_totals["alone"], 1);
}

#[tokio::test]
async fn test_http_fetcher_sends_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![], 1);
    let fetcher = HttpFetcher::from_config(&config.user_agent, Duration::from_secs(2))
        .expect("client should build");

    let body = fetcher
        .fetch(&format!("{}/", mock_server.uri()))
        .await
        .expect("fetch should succeed");
    assert_eq!(body, b"hello");
}

#[tokio::test]
async fn test_http_fetcher_maps_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![], 1);
    let fetcher = HttpFetcher::from_config(&config.user_agent, Duration::from_secs(2))
        .expect("client should build");

    let result = fetcher
        .fetch(&format!("{}/missing", mock_server.uri()))
        .await;
    assert_eq!(result, Err(FetchError::Status(404)));
}

#[tokio::test]
async fn test_slow_page_hits_deadline() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<p>late</p>".to_string()).set_delay(Duration::from_millis(1_500)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(vec![format!("{}/", base_url)], 0);
    config.crawler.fetch_timeout_ms = 200;
    let (summary, report) = run_crawl(&config).await.expect("crawl should run");

    assert_eq!(report.fetched, 0);
    assert_eq!(report.bad_request, 1);
    assert_eq!(summary.unique_pages(), 0);
}
