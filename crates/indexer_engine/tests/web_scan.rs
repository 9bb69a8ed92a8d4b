use std::thread;
use std::time::{Duration, Instant};

use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use indexer_core::{KeywordCounts, KeywordSet};
use indexer_engine::{Engine, EngineSettings, QueryError, ValidationError};

/// Keeps the runtime that backs the mock server alive for the test's
/// duration.
struct TestServer {
    runtime: Runtime,
    server: MockServer,
}

impl TestServer {
    fn start() -> Self {
        let runtime = Runtime::new().expect("test runtime");
        let server = runtime.block_on(MockServer::start());
        Self { runtime, server }
    }

    fn mount(&self, route: &str, body: &str) {
        let response =
            ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html; charset=utf-8");
        self.runtime.block_on(
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(response)
                .mount(&self.server),
        );
    }

    fn url(&self, route: &str) -> String {
        format!("{}{route}", self.server.uri())
    }
}

fn start_engine(keywords: &[&str], depth: u32) -> Engine {
    indexer_logging::initialize_for_tests();
    let settings = EngineSettings {
        keywords: KeywordSet::new(keywords.iter().copied()),
        web_depth_limit: depth,
        // Keep the crawler quiet; these tests drive the web side only.
        crawl_interval: Duration::from_secs(3600),
        ..EngineSettings::default()
    };
    Engine::start(settings).expect("engine start")
}

fn wait_for_result(engine: &Engine, key: &str) -> KeywordCounts {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        match engine.query_result(key) {
            Ok(counts) => return counts,
            Err(QueryError::NotFound(_) | QueryError::NotReady(_))
                if Instant::now() < deadline =>
            {
                thread::sleep(Duration::from_millis(20));
            }
            Err(err) => panic!("result for {key} never arrived: {err}"),
        }
    }
}

#[test]
fn page_scan_counts_keywords_in_body_text() {
    let server = TestServer::start();
    server.mount(
        "/doc",
        "<html><body><p>alpha beta</p><p>alpha!</p></body></html>",
    );

    let engine = start_engine(&["alpha", "beta"], 0);
    assert_eq!(engine.add_url(&server.url("/doc")), Ok(true));

    let counts = wait_for_result(&engine, &format!("web|{}", server.url("/doc")));
    assert_eq!(counts["alpha"], 2);
    assert_eq!(counts["beta"], 1);
    engine.stop();
}

#[test]
fn resubmitting_a_url_within_the_refresh_window_is_rejected() {
    let server = TestServer::start();
    server.mount("/once", "<html><body>alpha</body></html>");

    let engine = start_engine(&["alpha"], 0);
    let url = server.url("/once");
    assert_eq!(engine.add_url(&url), Ok(true));
    assert_eq!(engine.add_url(&url), Ok(false));

    wait_for_result(&engine, &format!("web|{url}"));
    engine.stop();
}

#[test]
fn depth_one_scan_fans_out_exactly_one_level() {
    let server = TestServer::start();
    server.mount(
        "/a",
        r#"<html><body>alpha <a href="/b">b</a> <a href="/c">c</a></body></html>"#,
    );
    server.mount("/b", r#"<html><body>alpha <a href="/d">d</a></body></html>"#);
    server.mount("/c", "<html><body>alpha alpha</body></html>");
    server.mount("/d", "<html><body>alpha</body></html>");

    let engine = start_engine(&["alpha"], 1);
    assert_eq!(engine.add_url(&server.url("/a")), Ok(true));

    // The two linked pages are scanned at depth 0.
    assert_eq!(
        wait_for_result(&engine, &format!("web|{}", server.url("/a")))["alpha"],
        1
    );
    assert_eq!(
        wait_for_result(&engine, &format!("web|{}", server.url("/b")))["alpha"],
        1
    );
    assert_eq!(
        wait_for_result(&engine, &format!("web|{}", server.url("/c")))["alpha"],
        2
    );

    // Depth 0 performs no further recursion: /d never gets a job.
    thread::sleep(Duration::from_millis(300));
    assert_eq!(
        engine.query_result(&format!("web|{}", server.url("/d"))),
        Err(QueryError::NotFound(format!("web|{}", server.url("/d"))))
    );
    engine.stop();
}

#[test]
fn fetch_failure_completes_with_a_zero_seeded_result() {
    let server = TestServer::start();
    // No mock mounted: the server answers 404.

    let engine = start_engine(&["alpha", "beta"], 1);
    let url = server.url("/missing");
    assert_eq!(engine.add_url(&url), Ok(true));

    let counts = wait_for_result(&engine, &format!("web|{url}"));
    let keys: Vec<_> = counts.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["alpha", "beta"]);
    assert!(counts.values().all(|&c| c == 0));
    engine.stop();
}

#[test]
fn collect_links_lists_absolute_targets_without_scheduling_scans() {
    let server = TestServer::start();
    server.mount(
        "/index",
        r#"<html><body><a href="/one">1</a> <a href="https://other.org/two">2</a></body></html>"#,
    );

    let engine = start_engine(&["alpha"], 1);
    let links = engine.collect_links(&server.url("/index")).unwrap();
    let links: Vec<_> = links.iter().map(|l| l.to_string()).collect();
    assert_eq!(links, vec![server.url("/one"), "https://other.org/two".to_string()]);

    // Listing links is passive: nothing was registered for the page.
    assert!(matches!(
        engine.query_result(&format!("web|{}", server.url("/index"))),
        Err(QueryError::NotFound(_))
    ));
    engine.stop();
}

#[test]
fn add_url_rejects_malformed_and_unsupported_urls() {
    let engine = start_engine(&["alpha"], 0);
    assert!(matches!(
        engine.add_url("not a url"),
        Err(ValidationError::InvalidUrl(_))
    ));
    assert!(matches!(
        engine.add_url("ftp://example.com/file"),
        Err(ValidationError::InvalidUrl(_))
    ));
    engine.stop();
}
