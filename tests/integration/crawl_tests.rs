//! Integration tests for incremental checks
//!
//! These tests use wiremock to serve listing pages over HTTP and drive the
//! full check cycle end-to-end, with the checkpoint kept in a temp directory.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use espi_watch::checkpoint::{read_checkpoint, save_checkpoint, JsonFileStore};
use espi_watch::config::{Config, UserAgentConfig};
use espi_watch::crawler::{build_http_client, fetch_page, FixedClock, HttpPageSource};
use espi_watch::{FetchError, ReportWatcher, UrlBuilder};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REPORTS_PATH: &str = "/pl/reports/espi/term,";

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn listing_path(y: i32, m: u32, d: u32, page: u32) -> String {
    format!("{}{},{},{},{}", REPORTS_PATH, y, m, d, page)
}

/// Creates report rows linking back to the mock server
fn rows(server: &str, times: &[&str]) -> Vec<String> {
    times
        .iter()
        .enumerate()
        .map(|(i, time)| {
            format!(
                r#"<tr class="inf"><td>{time}</td><td><img src="/img/espi.gif"></td><td><b>Company {i} SA</b></td><td><a href="{server}/pl/reports/espi/view/{i}">Raport bieżący</a></td></tr>"#
            )
        })
        .collect()
}

fn listing(rows: &[String], total_pages: Option<u32>) -> String {
    let pagination = total_pages
        .map(|n| format!(r#"<div class="stronicowanie">Strona <b>1</b> z <b>{n}</b></div>"#))
        .unwrap_or_default();
    format!(
        r#"<html><head><title>Raporty</title></head><body><table class="espi"><tbody>{}</tbody></table>{}</body></html>"#,
        rows.join(""),
        pagination
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

fn watcher(server: &MockServer, checkpoint: &Path, threshold: NaiveDateTime) -> ReportWatcher {
    let client = build_http_client(&UserAgentConfig::default()).expect("Failed to build client");
    ReportWatcher::new(
        Box::new(HttpPageSource::new(client, Duration::ZERO)),
        Box::new(UrlBuilder::new(server.uri(), REPORTS_PATH)),
        Box::new(JsonFileStore::new(checkpoint)),
        Box::new(FixedClock(threshold)),
    )
    .expect("Failed to create watcher")
}

#[tokio::test]
async fn test_two_page_listing_over_http() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let page_one = rows(
        &base_url,
        &[
            "17:50", "17:40", "17:30", "17:20", "17:10", "17:00", "16:50", "16:40", "16:30",
            "16:20", "16:10", "16:00", "15:50", "15:40", "15:30", "15:20", "15:10", "15:00",
            "14:50", "14:40",
        ],
    );
    let page_two = rows(&base_url, &["08:15"]);

    Mock::given(method("GET"))
        .and(path(listing_path(2015, 8, 26, 1)))
        .respond_with(html(listing(&page_one, Some(2))))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(listing_path(2015, 8, 26, 2)))
        .respond_with(html(listing(&page_two, Some(2))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let checkpoint = dir.path().join("last-check.json");
    save_checkpoint(at(2015, 8, 26, 0, 0), &checkpoint).unwrap();

    let mut watcher = watcher(&mock_server, &checkpoint, at(2015, 8, 27, 0, 0));
    let reports = watcher.reports_since_last_check().await;

    assert_eq!(reports.len(), 21);
    assert_eq!(reports[0].company_name, "Company 0");
    assert_eq!(reports[0].publication_date_time, at(2015, 8, 26, 17, 50));
    assert_eq!(
        reports[0].report_link,
        format!("{}/pl/reports/espi/view/0", base_url)
    );
    assert_eq!(read_checkpoint(&checkpoint).unwrap(), at(2015, 8, 27, 0, 0));
}

#[tokio::test]
async fn test_next_run_resumes_from_persisted_checkpoint() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Served once: the second run must not fetch anything
    Mock::given(method("GET"))
        .and(path(listing_path(2015, 9, 14, 1)))
        .respond_with(html(listing(&rows(&base_url, &["09:33"]), None)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let checkpoint = dir.path().join("last-check.json");
    save_checkpoint(at(2015, 9, 14, 0, 0), &checkpoint).unwrap();

    let mut first = watcher(&mock_server, &checkpoint, at(2015, 9, 15, 0, 0));
    assert_eq!(first.reports_since_last_check().await.len(), 1);

    let mut second = watcher(&mock_server, &checkpoint, at(2015, 9, 15, 0, 0));
    assert_eq!(second.last_check(), at(2015, 9, 15, 0, 0));
    assert!(second.reports_since_last_check().await.is_empty());
}

#[tokio::test]
async fn test_server_error_keeps_checkpoint_and_returns_partial_results() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path(listing_path(2015, 9, 14, 1)))
        .respond_with(html(listing(&rows(&base_url, &["16:00", "12:30"]), None)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(listing_path(2015, 9, 15, 1)))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let checkpoint = dir.path().join("last-check.json");
    save_checkpoint(at(2015, 9, 14, 0, 0), &checkpoint).unwrap();

    let mut watcher = watcher(&mock_server, &checkpoint, at(2015, 9, 15, 10, 0));
    let reports = watcher.reports_since_last_check().await;

    assert_eq!(reports.len(), 2);
    assert_eq!(read_checkpoint(&checkpoint).unwrap(), at(2015, 9, 14, 0, 0));
}

#[tokio::test]
async fn test_missing_checkpoint_directory_is_created_on_save() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(listing_path(2015, 9, 16, 1)))
        .respond_with(html(listing(&[], None)))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let checkpoint = dir.path().join("App_Data").join("last-check.json");

    let mut watcher = watcher(&mock_server, &checkpoint, at(2015, 9, 17, 0, 0));
    assert_eq!(watcher.last_check(), NaiveDateTime::default());

    watcher.set_last_check(at(2015, 9, 16, 0, 0));
    assert!(watcher.reports_since_last_check().await.is_empty());
    assert_eq!(read_checkpoint(&checkpoint).unwrap(), at(2015, 9, 17, 0, 0));
}

#[tokio::test]
async fn test_watcher_from_config_checks_today() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/pl/reports/espi/term,\d+,\d+,\d+,1$"))
        .respond_with(html(listing(&[], None)))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let checkpoint = dir.path().join("last-check.json");
    let start_of_today = Local::now().date_naive().and_time(NaiveTime::MIN);
    save_checkpoint(start_of_today, &checkpoint).unwrap();

    let mut config = Config::default();
    config.listing.server_address = mock_server.uri();
    config.checkpoint.path = checkpoint.display().to_string();
    config.fetch.minimum_time_between_requests = 0;

    let mut watcher = ReportWatcher::from_config(&config).expect("Failed to create watcher");
    let reports = watcher.reports_since_last_check().await;

    assert!(reports.is_empty());
    assert!(read_checkpoint(&checkpoint).unwrap() > start_of_today);
}

#[tokio::test]
async fn test_fetch_page_reports_status_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = build_http_client(&UserAgentConfig::default()).unwrap();
    let result = fetch_page(&client, &format!("{}/missing", mock_server.uri())).await;

    assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
}
