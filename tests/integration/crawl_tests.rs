//! Integration tests for the scraper
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full scrape cycle end-to-end against real output files.

use std::path::Path;
use sumi_scrape::config::Config;
use sumi_scrape::crawler::{crawl, DefaultCoordinator};
use sumi_scrape::output::SelectorFileSink;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for the mock server writing into `dir`
fn create_test_config(base_url: &str, dir: &Path, max_depth: u32) -> Config {
    let mut config = Config::new(base_url);
    config.sub_path = "/".to_string();
    config.output_dir = dir.to_path_buf();
    config.max_depth = max_depth;
    config
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_site(server: &MockServer) {
    mount_page(
        server,
        "/",
        r#"<html><head><title>Home</title></head><body>
        <a href="/page1">Page 1</a>
        <a href="/page2">Page 2</a>
        <a href="https://elsewhere.example.org/x">Away</a>
        </body></html>"#,
    )
    .await;

    mount_page(
        server,
        "/page1",
        r#"<html><body><div class="content">Content one</div>
        <a href="/">Home</a></body></html>"#,
    )
    .await;

    mount_page(
        server,
        "/page2",
        r#"<html><body><p>Content two</p></body></html>"#,
    )
    .await;
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), temp_dir.path(), 10);

    let summary = crawl(config.clone()).await.expect("Crawl should succeed");

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.queued, 0);
    assert!(!summary.cancelled);

    let html = std::fs::read_to_string(config.output_path()).expect("capture exists");
    let home = html.find("<title>Home</title>").expect("home captured");
    let one = html.find("Content one").expect("page1 captured");
    let two = html.find("Content two").expect("page2 captured");
    assert!(home < one && one < two, "pages appended in FIFO order");

    let md_path = summary.converted_path.expect("markdown written");
    assert_eq!(md_path, temp_dir.path().join("output.md"));
    let markdown = std::fs::read_to_string(md_path).expect("markdown readable");
    assert!(markdown.contains("Content one"));
    assert!(markdown.contains("Content two"));
}

#[tokio::test]
async fn test_crawl_respects_max_depth() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), temp_dir.path(), 1);

    let summary = crawl(config.clone()).await.expect("Crawl should succeed");

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.depth, 1);
    assert_eq!(summary.queued, 2);
    assert!(summary.hit_depth_limit());

    let html = std::fs::read_to_string(config.output_path()).expect("capture exists");
    assert!(!html.contains("Content one"));
}

#[tokio::test]
async fn test_crawl_continues_past_missing_page() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/gone">Gone</a><a href="/here">Here</a>"#,
    )
    .await;
    mount_page(&mock_server, "/here", "<p>Still here</p>").await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), temp_dir.path(), 10);

    let summary = crawl(config.clone()).await.expect("Crawl should succeed");

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.failed, 1);

    let html = std::fs::read_to_string(config.output_path()).expect("capture exists");
    assert!(html.contains("Still here"));
    assert!(summary.converted_path.is_some());
}

#[tokio::test]
async fn test_crawl_writes_selector_data_file() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = create_test_config(&mock_server.uri(), temp_dir.path(), 10);
    config.target_selector = Some(".content".to_string());

    let summary = crawl(config).await.expect("Crawl should succeed");

    assert_eq!(summary.extracted, 1);
    assert_eq!(summary.fallback_extracted, 2);

    let data_path = SelectorFileSink::new(temp_dir.path()).data_path(".content");
    let data = std::fs::read_to_string(data_path).expect("data file exists");
    assert!(data.starts_with("Extracted data for selector '.content'"));
    assert!(data.contains(&format!("PAGE: {}/page1", mock_server.uri())));
    assert!(data.contains("Content one"));
    assert!(data.contains("Content two"));
}

#[tokio::test]
async fn test_crawl_sublink_filter() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/docs/intro">Docs</a><a href="/blog/post">Blog</a>"#,
    )
    .await;
    mount_page(&mock_server, "/docs/intro", "<p>Intro</p>").await;
    mount_page(&mock_server, "/blog/post", "<p>Post</p>").await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = create_test_config(&mock_server.uri(), temp_dir.path(), 10);
    config.sublinks = vec!["docs".to_string()];

    let summary = crawl(config.clone()).await.expect("Crawl should succeed");

    assert_eq!(summary.processed, 2);

    let html = std::fs::read_to_string(config.output_path()).expect("capture exists");
    assert!(html.contains("Intro"));
    assert!(!html.contains("Post"));
}

#[tokio::test]
async fn test_existing_capture_is_truncated() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", "<p>fresh</p>").await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), temp_dir.path(), 1);
    std::fs::write(config.output_path(), "stale capture").expect("seed file");

    crawl(config.clone()).await.expect("Crawl should succeed");

    let html = std::fs::read_to_string(config.output_path()).expect("capture exists");
    assert!(!html.contains("stale"));
    assert!(html.contains("fresh"));
}

#[tokio::test]
async fn test_cancelled_coordinator_still_converts() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), temp_dir.path(), 10);

    let mut coordinator =
        DefaultCoordinator::from_config(&config).expect("Failed to create coordinator");
    coordinator.cancellation_token().cancel();

    let summary = coordinator.run().await.expect("Run should succeed");

    assert!(summary.cancelled);
    assert_eq!(summary.processed, 0);
    assert!(temp_dir.path().join("output.md").exists());
}
