//! Test: Extended Inputs - inputs document section merged with overrides

use super::runner;
use crate::helpers::*;
use crewline::runner::RunRequest;
use std::fs;

#[tokio::test]
async fn test_inputs_document_and_overrides() {
    let config = tempfile::tempdir().unwrap();
    let results = tempfile::tempdir().unwrap();
    let engine = RecordingEngine::new();
    let runner = runner(config.path(), results.path(), engine.clone());

    let request = RunRequest::new("extended").with_input("budget", "1000 EUR");
    let report = runner.run(&request).await;

    assert!(report.success, "{:?}", report.error);
    let run = engine.last_run();
    assert_eq!(run.tasks.len(), 8);
    assert_eq!(run.inputs["project_name"], "Lumen Notes");
    assert_eq!(run.inputs["budget"], "1000 EUR");

    let snapshot = fs::read_to_string(report.output_dir.unwrap().join("config_info.md")).unwrap();
    assert!(snapshot.contains("**pipeline_type:** extended"));
    assert!(snapshot.contains("**tasks_document:** tasks_extended.yaml"));
    assert!(snapshot.contains("**inputs_document:** inputs_extended.yaml"));
}

#[tokio::test]
async fn test_missing_inputs_document_is_not_fatal() {
    let config = tempfile::tempdir().unwrap();
    let results = tempfile::tempdir().unwrap();
    let engine = RecordingEngine::new();
    let runner = runner(config.path(), results.path(), engine.clone());

    let request = RunRequest::new("extended")
        .with_inputs_document("absent.yaml")
        .with_input("project_name", "Kettle")
        .with_save(false);
    let report = runner.run(&request).await;

    assert!(report.success);
    let run = engine.last_run();
    assert_eq!(run.inputs.len(), 1);
    assert_eq!(run.inputs["project_name"], "Kettle");
}
