use assert_cmd::Command;
use harlyze_cli::commands::aggregate::aggregate_files;
use harlyze_core::analysis::AggregateReport;
use predicates::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Helper to get path to test fixtures
fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(filename)
}

#[allow(deprecated)]
fn get_harlyze_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("harlyze")
}

/// A capture without any `pages`, holding one beacon request
const PAGELESS_HAR: &str = r#"{
  "log": {
    "version": "1.2",
    "creator": {"name": "curl-har", "version": "0.3"},
    "entries": [{
      "startedDateTime": "2024-03-05T09:00:00.000Z",
      "time": 4,
      "request": {"method": "GET", "url": "https://telemetry.example/b.gif", "httpVersion": "HTTP/1.1", "headers": [{"name": "Host", "value": "telemetry.example"}]},
      "response": {"status": 200, "httpVersion": "HTTP/1.1", "headers": [], "content": {"size": 43, "mimeType": "image/gif"}, "bodySize": 43},
      "timings": {"send": 0, "wait": 4, "receive": 0}
    }]
  }
}"#;

fn write_har(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn runs() -> Vec<PathBuf> {
    vec![
        fixture_path("run1.har"),
        fixture_path("run2.har"),
        fixture_path("run3.har"),
    ]
}

#[test]
fn test_aggregate_single_page() {
    let report = aggregate_files(&runs(), Some("page_1".to_string()), 0).unwrap();

    assert_eq!(report.runs, 3);
    assert_eq!(report.page_count, 3);

    let page = report.metric("page").unwrap();
    assert_eq!(page.samples, 3);
    assert_eq!(page.mean, Some(520.0));
    assert_eq!(page.stdev, 20.0);

    let ttfb = report.metric("ttfb").unwrap();
    assert_eq!(ttfb.mean, Some(90.0));
    assert_eq!(ttfb.stdev, 10.0);

    let js = report.metric("js").unwrap();
    assert_eq!(js.mean, Some(260.0));
    assert_eq!(js.stdev, 60.0);

    let html = report.metric("html").unwrap();
    assert_eq!(html.mean, Some(110.0));

    let image = report.metric("image").unwrap();
    assert_eq!(image.mean, Some(50.0));
    assert_eq!(image.stdev, 0.0);

    let css = report.metric("css").unwrap();
    assert_eq!(css.mean, Some(0.0));
    assert_eq!(css.stdev, 0.0);
}

#[test]
fn test_aggregate_all_pages_includes_unknown() {
    let report = aggregate_files(&runs(), None, 0).unwrap();

    // run2 has a page-less beacon
    assert_eq!(report.page_count, 4);

    // The unknown page has no onLoad or TTFB, so these are unchanged
    assert_eq!(report.metric("page").unwrap().samples, 3);
    assert_eq!(report.metric("page").unwrap().mean, Some(520.0));
    assert_eq!(report.metric("ttfb").unwrap().samples, 3);

    // 50, 50, 50 and the 4 ms beacon: 38.5 rounds half to even
    let image = report.metric("image").unwrap();
    assert_eq!(image.samples, 4);
    assert_eq!(image.mean, Some(38.0));
    assert_eq!(image.stdev, 23.0);
}

#[test]
fn test_aggregate_precision() {
    let report = aggregate_files(&runs(), None, 1).unwrap();
    assert_eq!(report.decimal_precision, 1);
    assert_eq!(report.metric("image").unwrap().mean, Some(38.5));
}

#[test]
fn test_aggregate_unmatched_page() {
    let report = aggregate_files(&runs(), Some("page_9".to_string()), 0).unwrap();

    assert_eq!(report.page_count, 0);
    assert!(report.metrics.iter().all(|m| m.mean.is_none()));
}

#[test]
fn test_aggregate_requires_files() {
    assert!(aggregate_files(&[], None, 0).is_err());
}

#[test]
fn test_aggregate_command_json_output() {
    let mut cmd = Command::new(get_harlyze_bin());
    cmd.arg("aggregate")
        .args(runs())
        .arg("--page")
        .arg("page_1")
        .arg("--format")
        .arg("json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let report: AggregateReport = serde_json::from_slice(&output).unwrap();
    assert_eq!(report.metric("page").unwrap().mean, Some(520.0));
    assert_eq!(report.metric("js").unwrap().stdev, 60.0);
}

#[test]
fn test_aggregate_command_precision_from_env() {
    let mut cmd = Command::new(get_harlyze_bin());
    cmd.env("HARLYZE_PRECISION", "2")
        .arg("aggregate")
        .args(runs())
        .arg("--format")
        .arg("table");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("Metric,Samples,Mean (ms),Stdev (ms)"))
        .stdout(predicate::str::contains("page,3,520.00,20.00"))
        .stdout(predicate::str::contains("image,4,38.50,23.00"));
}

#[test]
fn test_aggregate_command_pretty_output() {
    let mut cmd = Command::new(get_harlyze_bin());
    cmd.arg("aggregate").args(runs());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Multi-Run Aggregate"))
        .stdout(predicate::str::contains("run2.har"))
        .stdout(predicate::str::contains("520.00 ms"));
}

#[test]
fn test_aggregate_command_requires_files() {
    let mut cmd = Command::new(get_harlyze_bin());
    cmd.arg("aggregate");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_aggregate_pageless_runs() {
    let first = write_har(PAGELESS_HAR);
    let second = write_har(PAGELESS_HAR);
    let files = vec![first.path().to_path_buf(), second.path().to_path_buf()];

    let report = aggregate_files(&files, None, 0).unwrap();
    assert_eq!(report.runs, 2);
    assert_eq!(report.page_count, 2);
    assert_eq!(report.metric("page").unwrap().mean, None);
    assert_eq!(report.metric("image").unwrap().mean, Some(4.0));
    assert_eq!(report.metric("image").unwrap().stdev, 0.0);
}

#[test]
fn test_aggregate_command_stops_on_malformed_run() {
    let broken = write_har("{\"log\": [");

    Command::new(get_harlyze_bin())
        .arg("aggregate")
        .arg(fixture_path("run1.har"))
        .arg(broken.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse HAR file"));
}
