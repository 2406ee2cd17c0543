//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end over real HTTP.

use std::sync::Arc;
use std::time::Duration;
use sumi_index::config::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use sumi_index::crawler::Coordinator;
use sumi_index::storage::{load_index, save_index};
use sumi_index::{CrawlOutcome, CrawlReport, InvertedIndex};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration that stays on the mock server
fn create_test_config(base_url: &str, page_budget: u32, fetch_timeout: u64) -> Config {
    Config {
        crawler: CrawlerConfig {
            workers: 4,
            seed_url: format!("{}/", base_url),
            target_domain: base_url.to_string(),
            page_budget,
            fetch_timeout,
            politeness_delay: 0,
            job_queue_capacity: 10,
            result_queue_capacity: 10,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            index_path: "./test_index.json".to_string(),
        },
    }
}

/// Mounts an HTML page at `route`
async fn mount_page(server: &MockServer, route: &str, body: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body.to_string())
                .insert_header("content-type", "text/html"),
        )
        .expect(times)
        .mount(server)
        .await;
}

async fn crawl(config: Config) -> (CrawlReport, Arc<InvertedIndex>) {
    let index = Arc::new(InvertedIndex::new());
    let coordinator = Coordinator::new(config, Arc::clone(&index), CancellationToken::new())
        .expect("Failed to create coordinator");

    let report = tokio::time::timeout(Duration::from_secs(20), coordinator.run())
        .await
        .expect("Crawl did not terminate")
        .expect("Crawl failed");

    (report, index)
}

#[tokio::test]
async fn test_two_page_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body><p>Hello World</p>
        <a href="/b">B</a>
        <a href="https://other.org/x">Elsewhere</a>
        </body></html>"#,
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/b",
        r#"<html><body><p>hello there</p><a href="/">Home</a></body></html>"#,
        1,
    )
    .await;

    let (report, index) = crawl(create_test_config(&base_url, 2, 2000)).await;

    let a = format!("{}/", base_url);
    let b = format!("{}/b", base_url);

    assert_eq!(report.outcome, CrawlOutcome::Completed);
    assert_eq!(report.pages_scheduled, 2);
    assert_eq!(report.pages_indexed, 2);
    assert_eq!(report.in_flight_at_exit, 0);
    assert_eq!(index.search("hello"), vec![a.clone(), b.clone()]);
    assert_eq!(index.search("world"), vec![a]);
    assert_eq!(index.search("there"), vec![b]);
    assert!(index.search("x").is_empty());
}

#[tokio::test]
async fn test_requests_carry_user_agent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact; test@example.com)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>identified crawler</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (report, index) = crawl(create_test_config(&base_url, 5, 2000)).await;

    assert_eq!(report.pages_indexed, 1);
    assert_eq!(index.search("identified"), vec![format!("{}/", base_url)]);
}

#[tokio::test]
async fn test_slow_page_times_out_and_still_completes() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body>front page <a href="/slow">Slow</a></body></html>"#,
        1,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>tortoise content</p>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let (report, index) = crawl(create_test_config(&base_url, 10, 300)).await;

    assert_eq!(report.outcome, CrawlOutcome::Completed);
    assert_eq!(report.pages_scheduled, 2);
    assert_eq!(report.pages_indexed, 1);
    assert_eq!(report.pages_failed, 1);
    assert!(index.search("tortoise").is_empty());
    assert_eq!(index.search("front"), vec![format!("{}/", base_url)]);
}

#[tokio::test]
async fn test_error_status_pages_are_indexed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body><a href="/gone">Gone</a></body></html>"#,
        1,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<p>nothing here</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (report, index) = crawl(create_test_config(&base_url, 10, 2000)).await;

    assert_eq!(report.pages_indexed, 2);
    assert_eq!(report.pages_failed, 0);
    assert_eq!(index.search("nothing"), vec![format!("{}/gone", base_url)]);
}

#[tokio::test]
async fn test_budget_of_one_fetches_only_seed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body>lonely seed
        <a href="/one">1</a><a href="/two">2</a><a href="/three">3</a>
        </body></html>"#,
        1,
    )
    .await;
    for route in ["/one", "/two", "/three"] {
        mount_page(&mock_server, route, "<p>never fetched</p>", 0).await;
    }

    let (report, index) = crawl(create_test_config(&base_url, 1, 2000)).await;

    assert_eq!(report.pages_scheduled, 1);
    assert_eq!(report.pages_indexed, 1);
    assert!(index.search("never").is_empty());
    // Wiremock verifies the expect(0) mocks when the server drops
}

#[tokio::test]
async fn test_cycle_fetches_each_page_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/a">A</a><a href="/b">B</a><a href="/#top">Top</a>"#,
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/a",
        r#"<p>alpha</p><a href="/">Home</a><a href="/b">B</a><a href="/a">Self</a>"#,
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/b",
        r#"<p>bravo</p><a href="/a">A</a><a href="/">Home</a>"#,
        1,
    )
    .await;

    let (report, index) = crawl(create_test_config(&base_url, 50, 2000)).await;

    assert_eq!(report.outcome, CrawlOutcome::Completed);
    assert_eq!(report.pages_scheduled, 3);
    assert_eq!(report.pages_indexed, 3);
    assert!(report.links_rejected >= 5);
    assert_eq!(index.search("alpha"), vec![format!("{}/a", base_url)]);
    assert_eq!(index.search("bravo"), vec![format!("{}/b", base_url)]);
}

#[tokio::test]
async fn test_cancellation_stops_crawl_promptly() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>too slow</p>")
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&mock_server)
        .await;

    let index = Arc::new(InvertedIndex::new());
    let shutdown = CancellationToken::new();
    let coordinator = Coordinator::new(
        create_test_config(&base_url, 10, 30_000),
        Arc::clone(&index),
        shutdown.clone(),
    )
    .expect("Failed to create coordinator");

    let handle = tokio::spawn(coordinator.run());
    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.cancel();

    let report = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("Cancelled crawl did not stop")
        .expect("Crawl task panicked")
        .expect("Crawl failed");

    assert_eq!(report.outcome, CrawlOutcome::Cancelled);
    assert_eq!(report.in_flight_at_exit, 1);
    assert!(index.is_empty());
}

#[tokio::test]
async fn test_crawled_index_survives_save_and_load() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body>persistent words <a href="/next">Next</a></body></html>"#,
        1,
    )
    .await;
    mount_page(&mock_server, "/next", "<p>more persistent words</p>", 1).await;

    let (_, index) = crawl(create_test_config(&base_url, 10, 2000)).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let index_path = dir.path().join("index.json");

    let saved = save_index(&index, &index_path, Some("abc123")).expect("Failed to save index");
    assert_eq!(saved.token_count, index.len());

    let loaded = load_index(&index_path).expect("Failed to load index");
    assert_eq!(loaded.snapshot(), index.snapshot());
    assert_eq!(
        loaded.search("persistent"),
        vec![format!("{}/", base_url), format!("{}/next", base_url)]
    );
}
