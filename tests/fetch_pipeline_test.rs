use async_trait::async_trait;
use httpmock::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use swim_scrape::adapters::http::ACCEPT_HEADER;
use swim_scrape::domain::ports::PageRenderer;
use swim_scrape::{
    EventScraper, EventSpec, FailureMode, HttpTransport, LocalStorage, ParsePolicy,
    ResultsPipeline, ScrapeError,
};
use tempfile::TempDir;

const EVENT_PATH: &str = "/ma/2024-2025/compilation/finals/boys-d1-100-backstroke.xml";

fn event(out: &str) -> EventSpec {
    EventSpec {
        season: "2024-2025".to_string(),
        phase: "finals".to_string(),
        gender: "boys".to_string(),
        division: "d1".to_string(),
        event_slug: "100-backstroke".to_string(),
        state: "ma".to_string(),
        out: out.to_string(),
        meet_slug: None,
        extension: None,
        render_js: None,
    }
}

fn policy(render_js: bool, failure_mode: FailureMode) -> ParsePolicy {
    ParsePolicy {
        render_js,
        failure_mode,
        timeout_secs: 5.0,
    }
}

fn scraper(
    server: &MockServer,
    temp_dir: &TempDir,
    pipeline: ResultsPipeline,
) -> EventScraper<LocalStorage> {
    EventScraper::new(
        server.base_url(),
        Arc::new(HttpTransport::new().unwrap()),
        pipeline,
        LocalStorage::new(temp_dir.path()),
    )
}

struct CountingRenderer {
    body: &'static str,
    calls: AtomicUsize,
}

#[async_trait]
impl PageRenderer for CountingRenderer {
    async fn render(&self, _url: &str, timeout_ms: u64) -> swim_scrape::Result<Vec<u8>> {
        assert_eq!(timeout_ms, 5000);
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.body.as_bytes().to_vec())
    }
}

#[tokio::test]
async fn test_xml_embedded_in_html_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start_async().await;

    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(EVENT_PATH)
                .header("Accept", ACCEPT_HEADER);
            then.status(200)
                .header("Content-Type", "text/html")
                .body(r#"<html><xml><results><result rk="1" nm="Krys Gorski" gr="Sr" sc="WAN" ti="48.92" mt="nedistrict24" auto="yes"></result></results></xml></html>"#);
        })
        .await;

    let scraper = scraper(&server, &temp_dir, ResultsPipeline::new());
    let rows = scraper
        .fetch_event(&event("unused.csv"), &policy(false, FailureMode::Strict))
        .await
        .unwrap();

    api_mock.assert_async().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].iter().collect::<Vec<_>>(),
        vec![
            ("rk", "1"),
            ("nm", "Krys Gorski"),
            ("gr", "Sr"),
            ("sc", "WAN"),
            ("ti", "48.92"),
            ("mt", "nedistrict24"),
            ("auto", "yes"),
        ]
    );
}

#[tokio::test]
async fn test_scrape_to_csv_writes_file() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path(EVENT_PATH);
            then.status(200)
                .header("Content-Type", "application/xml")
                .body(concat!(
                    "<results>",
                    "<result rk=\"1\" nm=\"Krys Gorski\" ti=\"48.92\" sh=\"Y\"/>",
                    "<result rk=\"2\" nm=\"Jane Doe\" ti=\"50.10\" ct=\"MA\"/>",
                    "</results>"
                ));
        })
        .await;

    let scraper = scraper(&server, &temp_dir, ResultsPipeline::new());
    let path = scraper
        .scrape_to_csv(&event("data/boys-d1-100-back.csv"), &policy(false, FailureMode::Strict))
        .await
        .unwrap();

    assert_eq!(path, "data/boys-d1-100-back.csv");
    let written = std::fs::read_to_string(temp_dir.path().join(&path)).unwrap();
    assert_eq!(
        written,
        "rk,nm,gr,sc,ti,mt,auto,sh,ct\n1,Krys Gorski,,,48.92,,,Y,\n2,Jane Doe,,,50.10,,,,MA\n"
    );
}

#[tokio::test]
async fn test_latin1_csv_endpoint() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start_async().await;

    let mut body = b"rk,nm,sc\n1,Ren".to_vec();
    body.push(0xe9);
    body.extend_from_slice(b" Martin,WAN\n");

    server
        .mock_async(|when, then| {
            when.method(GET).path(EVENT_PATH);
            then.status(200)
                .header("Content-Type", "text/csv; charset=ISO-8859-1")
                .body(body.clone());
        })
        .await;

    let scraper = scraper(&server, &temp_dir, ResultsPipeline::new());
    let rows = scraper
        .fetch_event(&event("x.csv"), &policy(false, FailureMode::Strict))
        .await
        .unwrap();

    assert_eq!(rows[0].get("nm"), Some("René Martin"));
    assert!(!rows[0].contains_key("ti"));
}

#[tokio::test]
async fn test_http_status_is_surfaced() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path(EVENT_PATH);
            then.status(404);
        })
        .await;

    let scraper = scraper(&server, &temp_dir, ResultsPipeline::new());
    let result = scraper
        .scrape_to_csv(&event("missing.csv"), &policy(false, FailureMode::Lenient))
        .await;

    assert!(matches!(
        result,
        Err(ScrapeError::HttpStatus { status: 404, .. })
    ));
    assert!(!temp_dir.path().join("missing.csv").exists());
}

#[tokio::test]
async fn test_empty_results_escalate_to_renderer_once() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start_async().await;

    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path(EVENT_PATH);
            then.status(200)
                .header("Content-Type", "text/html")
                .body("<html><xml><results></results></xml></html>");
        })
        .await;

    let renderer = Arc::new(CountingRenderer {
        body: "<html><body><xml><results><result rk=\"1\" nm=\"Krys Gorski\" auto=\"yes\"/></results></xml></body></html>",
        calls: AtomicUsize::new(0),
    });
    let scraper = scraper(
        &server,
        &temp_dir,
        ResultsPipeline::with_renderer(renderer.clone()),
    );

    let rows = scraper
        .fetch_event(&event("x.csv"), &policy(true, FailureMode::Strict))
        .await
        .unwrap();

    assert_eq!(api_mock.hits_async().await, 1);
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("nm"), Some("Krys Gorski"));
    assert_eq!(rows[0].get("gr"), Some(""));
}

#[tokio::test]
async fn test_per_event_render_override() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path(EVENT_PATH);
            then.status(200)
                .header("Content-Type", "text/html")
                .body("<html><xml><results></results></xml></html>");
        })
        .await;

    let renderer = Arc::new(CountingRenderer {
        body: "<results><result rk=\"7\"/></results>",
        calls: AtomicUsize::new(0),
    });
    let scraper = scraper(
        &server,
        &temp_dir,
        ResultsPipeline::with_renderer(renderer.clone()),
    );

    let mut event = event("x.csv");
    event.render_js = Some(true);

    let rows = scraper
        .fetch_event(&event, &policy(false, FailureMode::Strict))
        .await
        .unwrap();

    assert_eq!(rows[0].get("rk"), Some("7"));
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_empty_results_without_rendering() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path(EVENT_PATH);
            then.status(200)
                .header("Content-Type", "text/html")
                .body("<html><xml><results></results></xml></html>");
        })
        .await;

    let scraper = scraper(&server, &temp_dir, ResultsPipeline::new());

    let strict = scraper
        .scrape_to_csv(&event("strict.csv"), &policy(false, FailureMode::Strict))
        .await;
    assert!(matches!(strict, Err(ScrapeError::EmptyPayload { .. })));
    assert!(!temp_dir.path().join("strict.csv").exists());

    let lenient = scraper
        .scrape_to_csv(&event("lenient.csv"), &policy(false, FailureMode::Lenient))
        .await
        .unwrap();
    let written = std::fs::read(temp_dir.path().join(lenient)).unwrap();
    assert!(written.is_empty());
}
