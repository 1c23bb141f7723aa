//! Test: Failure Report - every failure leaves an error report

use super::runner;
use crate::helpers::*;
use crewline::runner::RunRequest;
use std::fs;
use std::sync::Arc;

#[tokio::test]
async fn test_engine_failure_writes_error_report() {
    let config = tempfile::tempdir().unwrap();
    let results = tempfile::tempdir().unwrap();
    let runner = runner(
        config.path(),
        results.path(),
        Arc::new(FailingEngine("rate limited")),
    );

    let report = runner.run(&RunRequest::new("standard")).await;

    assert!(!report.success);
    assert_eq!(report.completed_tasks, 0);
    assert!(report.results_file.is_none());
    let error = report.error.unwrap();
    assert!(error.contains("execution engine failed: rate limited"));

    let text = fs::read_to_string(report.error_report.unwrap()).unwrap();
    assert!(text.starts_with("# Pipeline Error Report"));
    assert!(text.contains("**Error:** execution engine failed: rate limited"));
    assert!(text.contains("**Pipeline:** standard"));
    assert!(text.contains("## Recommendations\n1. "));
}

#[tokio::test]
async fn test_unknown_type_writes_error_report() {
    let config = tempfile::tempdir().unwrap();
    let results = tempfile::tempdir().unwrap();
    let engine = RecordingEngine::new();
    let runner = runner(config.path(), results.path(), engine.clone());

    let report = runner.run(&RunRequest::new("gaming")).await;

    assert!(!report.success);
    assert!(report
        .error
        .unwrap()
        .contains("unknown pipeline type 'gaming' (available: standard, extended)"));
    assert!(engine.runs.lock().unwrap().is_empty());

    let dirs = subdirectories(results.path());
    assert_eq!(dirs.len(), 1);
    assert_eq!(files_with_prefix(&dirs[0], "error_report_").len(), 1);
}

#[tokio::test]
async fn test_unsupported_provider_writes_error_report() {
    let config = tempfile::tempdir().unwrap();
    let results = tempfile::tempdir().unwrap();
    let runner = runner(config.path(), results.path(), RecordingEngine::new());

    let mut request = RunRequest::new("standard");
    request.provider = Some("gpt".to_string());
    let report = runner.run(&request).await;

    assert!(!report.success);
    assert!(report.error.unwrap().contains("unsupported backend provider 'gpt'"));
    assert!(report.error_report.is_some());
}
