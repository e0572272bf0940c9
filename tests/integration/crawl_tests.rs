//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, writing into temporary output directories.

use sectioncrawl::config::Config;
use sectioncrawl::crawler::{crawl, Coordinator};
use sectioncrawl::output::{FailureKind, FsWriter, MarkdownDocument};
use sectioncrawl::split::split_directory;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing into `output`
fn create_test_config(output: &Path, max_depth: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    config.crawler.request_timeout_secs = 5;
    config.crawler.connect_timeout_secs = 5;
    config.output.directory = output.to_string_lossy().into_owned();
    config
}

/// An HTML page whose main content holds `content`
fn html_page(title: &str, content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!(
            "<html><head><title>{}</title></head><body><main>{}</main></body></html>",
            title, content
        ),
        "text/html; charset=utf-8",
    )
}

/// Mounts a page that must be requested exactly `expected` times
async fn mount_page(server: &MockServer, page_path: &str, title: &str, content: &str, expected: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_page(title, content))
        .expect(expected)
        .mount(server)
        .await;
}

/// Names of the files written to `dir`, sorted
fn written_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

#[tokio::test]
async fn test_depth_zero_visits_only_seed() {
    let server = MockServer::start().await;
    mount_page(&server, "/alpha", "Alpha", r#"<p>Start</p><a href="/beta">Beta</a>"#, 1).await;
    mount_page(&server, "/beta", "Beta", "<p>Never</p>", 0).await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(output.path(), 0);

    let report = crawl(config, &format!("{}/alpha", server.uri())).await.unwrap();

    assert_eq!(report.pages_visited(), 1);
    assert_eq!(report.pages_saved(), 1);
    assert_eq!(report.visited, vec![format!("{}/alpha", server.uri())]);

    let files = written_files(output.path());
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("_alpha.md"));
}

#[tokio::test]
async fn test_cycle_visits_each_page_once() {
    let server = MockServer::start().await;
    mount_page(&server, "/alpha", "Alpha", r#"<p>A</p><a href="/beta">Beta</a>"#, 1).await;
    mount_page(&server, "/beta", "Beta", r#"<p>B</p><a href="/alpha">Alpha</a>"#, 1).await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(output.path(), 3);

    let report = crawl(config, &format!("{}/alpha", server.uri())).await.unwrap();

    assert_eq!(report.pages_visited(), 2);
    assert_eq!(report.pages_saved(), 2);
    assert_eq!(report.statistics.total_failures(), 0);
}

#[tokio::test]
async fn test_depth_limit_respected() {
    let server = MockServer::start().await;
    mount_page(&server, "/alpha", "Alpha", r#"<p>A</p><a href="/beta">Beta</a>"#, 1).await;
    mount_page(&server, "/beta", "Beta", r#"<p>B</p><a href="/gamma">Gamma</a>"#, 1).await;
    mount_page(&server, "/gamma", "Gamma", "<p>Too deep</p>", 0).await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(output.path(), 1);

    let report = crawl(config, &format!("{}/alpha", server.uri())).await.unwrap();

    assert_eq!(report.pages_visited(), 2);
}

#[tokio::test]
async fn test_depth_first_order() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/alpha",
        "Alpha",
        r#"<p>A</p><a href="/beta">Beta</a><a href="/gamma">Gamma</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/beta", "Beta", r#"<p>B</p><a href="/delta">Delta</a>"#, 1).await;
    mount_page(&server, "/gamma", "Gamma", "<p>G</p>", 1).await;
    mount_page(&server, "/delta", "Delta", "<p>D</p>", 1).await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(output.path(), 2);

    let report = crawl(config, &format!("{}/alpha", server.uri())).await.unwrap();

    let base = server.uri();
    assert_eq!(
        report.visited,
        vec![
            format!("{}/alpha", base),
            format!("{}/beta", base),
            format!("{}/delta", base),
            format!("{}/gamma", base),
        ]
    );
}

#[tokio::test]
async fn test_fragments_and_duplicates_fetched_once() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/alpha",
        "Alpha",
        r##"<p>A</p><a href="/beta#part">Part</a><a href="/beta">Beta</a><a href="#top">Top</a>"##,
        1,
    )
    .await;
    mount_page(&server, "/beta", "Beta", "<p>B</p>", 1).await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(output.path(), 1);

    let report = crawl(config, &format!("{}/alpha", server.uri())).await.unwrap();

    assert_eq!(report.pages_visited(), 2);
}

#[tokio::test]
async fn test_boilerplate_section_not_written() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                r#"<html><head><title>Article</title></head><body>
                <div id="content"><h2>Intro</h2><p>x</p><h2>References</h2><p>y</p></div>
                </body></html>"#,
                "text/html",
            ),
        )
        .expect(1)
        .mount(&server)
        .await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(output.path(), 0);

    let report = crawl(config, &format!("{}/article", server.uri())).await.unwrap();

    assert_eq!(report.sections_saved(), 1);

    let files = written_files(output.path());
    assert_eq!(files.len(), 2);
    assert!(files.iter().any(|name| name.ends_with("_article_Intro.md")));
    assert!(!files.iter().any(|name| name.contains("References")));

    let intro = files.iter().find(|name| name.ends_with("_Intro.md")).unwrap();
    let content = std::fs::read_to_string(output.path().join(intro)).unwrap();
    let doc = MarkdownDocument::parse(&content).unwrap();
    assert_eq!(doc.title, "Intro");
    assert!(!doc.body.contains('y'));
}

#[tokio::test]
async fn test_long_multibyte_heading_does_not_end_branch() {
    let server = MockServer::start().await;
    let heading = "章".repeat(91);
    mount_page(
        &server,
        "/alpha",
        "Alpha",
        &format!(
            r#"<h2>{}</h2><p>x</p><h2>Second</h2><p>y</p><a href="/beta">Beta</a>"#,
            heading
        ),
        1,
    )
    .await;
    mount_page(&server, "/beta", "Beta", "<p>B</p>", 1).await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(output.path(), 1);

    let report = crawl(config, &format!("{}/alpha", server.uri())).await.unwrap();

    assert_eq!(report.pages_visited(), 2);
    assert_eq!(report.pages_saved(), 2);
    assert_eq!(report.sections_saved(), 2);
    assert_eq!(report.statistics.total_failures(), 0);

    let files = written_files(output.path());
    assert_eq!(files.len(), 4);
    assert!(files.iter().any(|name| name.ends_with("_alpha_Second.md")));
    assert!(files.iter().any(|name| name.ends_with("_beta.md")));
    assert!(files.iter().all(|name| name.len() < 255));

    let long = files.iter().find(|name| name.contains('章')).unwrap();
    let content = std::fs::read_to_string(output.path().join(long)).unwrap();
    assert_eq!(MarkdownDocument::parse(&content).unwrap().title, heading);
}

#[tokio::test]
async fn test_source_header_round_trips() {
    let server = MockServer::start().await;
    mount_page(&server, "/alpha", "Alpha Page", "<p>Hello</p>", 1).await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(output.path(), 0);
    let seed = format!("{}/alpha?utm_source=feed&b=2&a=1", server.uri());

    crawl(config, &seed).await.unwrap();

    let files = written_files(output.path());
    assert_eq!(files.len(), 1);
    let content = std::fs::read_to_string(output.path().join(&files[0])).unwrap();
    let doc = MarkdownDocument::parse(&content).unwrap();

    assert_eq!(doc.title, "Alpha Page");
    assert_eq!(doc.source, format!("{}/alpha?a=1&b=2", server.uri()));
    assert!(doc.body.contains("Hello"));
}

#[tokio::test]
async fn test_failed_link_does_not_abort_crawl() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/alpha",
        "Alpha",
        r#"<p>A</p><a href="/missing">Missing</a><a href="/beta">Beta</a>"#,
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/beta", "Beta", "<p>B</p>", 1).await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(output.path(), 1);

    let report = crawl(config, &format!("{}/alpha", server.uri())).await.unwrap();

    assert_eq!(report.pages_visited(), 3);
    assert_eq!(report.pages_saved(), 2);
    assert_eq!(report.statistics.failures_of(FailureKind::Fetch), 1);
}

#[tokio::test]
async fn test_non_html_response_is_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("{}", "application/json"),
        )
        .mount(&server)
        .await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(output.path(), 0);

    let report = crawl(config, &format!("{}/feed", server.uri())).await.unwrap();

    assert_eq!(report.pages_saved(), 0);
    assert_eq!(report.statistics.failures_of(FailureKind::Fetch), 1);
    assert!(written_files(output.path()).is_empty());
}

#[tokio::test]
async fn test_page_without_content_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blank"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                "<html><head><title>Blank</title></head><body></body></html>",
                "text/html",
            ),
        )
        .mount(&server)
        .await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(output.path(), 0);

    let report = crawl(config, &format!("{}/blank", server.uri())).await.unwrap();

    assert_eq!(report.pages_visited(), 1);
    assert_eq!(report.statistics.failures_of(FailureKind::NoContent), 1);
    assert!(written_files(output.path()).is_empty());
}

#[tokio::test]
async fn test_links_resolve_against_redirect_target() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alpha"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/landing", other.uri()).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/home", "Home", "<p>H</p>", 0).await;
    mount_page(
        &other,
        "/landing",
        "Landing",
        &format!(
            r#"<p>L</p><a href="/next">Next</a><a href="{}/home">Home</a>"#,
            server.uri()
        ),
        1,
    )
    .await;
    mount_page(&other, "/next", "Next", "<p>N</p>", 1).await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(output.path(), 1);

    let report = crawl(config, &format!("{}/alpha", server.uri())).await.unwrap();

    // relative links follow the redirect; the seed's own host is now external
    assert_eq!(
        report.visited,
        vec![format!("{}/alpha", server.uri()), format!("{}/next", other.uri())]
    );

    // the landing page is still named and sourced after the requested URL
    let seed_name = sectioncrawl::output::safe_name(
        &url::Url::parse(&format!("{}/alpha", server.uri())).unwrap(),
        "",
    );
    let content =
        std::fs::read_to_string(output.path().join(format!("{}.md", seed_name))).unwrap();
    let doc = MarkdownDocument::parse(&content).unwrap();
    assert_eq!(doc.title, "Landing");
    assert_eq!(doc.source, format!("{}/alpha", server.uri()));
}

#[tokio::test]
async fn test_pdf_links_never_fetched() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/alpha",
        "Alpha",
        r#"<p>A</p><a href="/files/report.pdf">Report</a>"#,
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/files/report.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let output = TempDir::new().unwrap();
    let mut config = create_test_config(output.path(), 2);
    config.crawler.allow_external = true;

    let report = crawl(config, &format!("{}/alpha", server.uri())).await.unwrap();

    assert_eq!(report.pages_visited(), 1);
}

#[tokio::test]
async fn test_external_links_skipped_by_default() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;
    mount_page(
        &server,
        "/alpha",
        "Alpha",
        &format!(r#"<p>A</p><a href="{}/elsewhere">Elsewhere</a>"#, other.uri()),
        1,
    )
    .await;
    mount_page(&other, "/elsewhere", "Elsewhere", "<p>E</p>", 0).await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(output.path(), 1);

    let report = crawl(config, &format!("{}/alpha", server.uri())).await.unwrap();

    assert_eq!(report.pages_visited(), 1);
}

#[tokio::test]
async fn test_external_links_followed_when_allowed() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;
    mount_page(
        &server,
        "/alpha",
        "Alpha",
        &format!(r#"<p>A</p><a href="{}/elsewhere">Elsewhere</a>"#, other.uri()),
        1,
    )
    .await;
    mount_page(&other, "/elsewhere", "Elsewhere", "<p>E</p>", 1).await;

    let output = TempDir::new().unwrap();
    let mut config = create_test_config(output.path(), 1);
    config.crawler.allow_external = true;

    let report = crawl(config, &format!("{}/alpha", server.uri())).await.unwrap();

    assert_eq!(report.pages_visited(), 2);
    assert_eq!(report.pages_saved(), 2);
}

#[tokio::test]
async fn test_concurrent_crawl_visits_each_page_once() {
    let server = MockServer::start().await;
    let links: String = (0..8)
        .map(|i| format!(r#"<a href="/page{}">Page {}</a><a href="/shared">Shared</a>"#, i, i))
        .collect();
    mount_page(&server, "/", "Home", &format!("<p>Home</p>{}", links), 1).await;
    for i in 0..8 {
        mount_page(
            &server,
            &format!("/page{}", i),
            "Page",
            r#"<p>Leaf</p><a href="/shared">Shared</a><a href="/">Home</a>"#,
            1,
        )
        .await;
    }
    mount_page(&server, "/shared", "Shared", "<p>Shared</p>", 1).await;

    let output = TempDir::new().unwrap();
    let mut config = create_test_config(output.path(), 2);
    config.crawler.max_concurrent_fetches = 4;

    let report = crawl(config, &server.uri()).await.unwrap();

    assert_eq!(report.pages_visited(), 10);
    assert_eq!(report.pages_saved(), 10);
}

#[tokio::test]
async fn test_invalid_seed_is_fatal() {
    let output = TempDir::new().unwrap();
    let config = create_test_config(output.path(), 0);

    let result = Coordinator::new(config)
        .unwrap()
        .run("mailto:someone@example.com")
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_crawl_output_can_be_split() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/alpha",
        "Alpha",
        "<h2>First</h2><p>One</p><h2>Second</h2><p>Two</p>",
        1,
    )
    .await;

    let output = TempDir::new().unwrap();
    let chunks = TempDir::new().unwrap();
    let config = create_test_config(output.path(), 0);

    crawl(config, &format!("{}/alpha", server.uri())).await.unwrap();

    let writer = FsWriter::new(chunks.path());
    let summary = split_directory(output.path(), &writer, Some(2), false).unwrap();

    assert_eq!(summary.files_processed, 3);
    assert_eq!(summary.files_failed, 0);
    assert!(summary.chunks_written >= 3);
    assert!(written_files(chunks.path())
        .iter()
        .all(|name| name.ends_with(".md")));
}
