//! Test: Successful Run - results and snapshot are written

use super::runner;
use crate::helpers::*;
use crewline::runner::RunRequest;
use std::fs;

#[tokio::test]
async fn test_results_and_snapshot_written() {
    let config = tempfile::tempdir().unwrap();
    let results = tempfile::tempdir().unwrap();
    let engine = RecordingEngine::new();
    let runner = runner(config.path(), results.path(), engine.clone());

    let request = RunRequest::new("standard").with_input("project_description", "A solar kettle");
    let report = runner.run(&request).await;

    assert!(report.success, "{:?}", report.error);
    assert_eq!(report.completed_tasks, 5);
    assert!(report.error_report.is_none());

    let run = engine.last_run();
    assert_eq!(run.label, "standard");
    assert_eq!(run.tasks.len(), 5);
    assert_eq!(run.inputs["project_description"], "A solar kettle");
    assert!(!run.memory);

    let document = fs::read_to_string(report.results_file.unwrap()).unwrap();
    assert!(document.starts_with("# Pipeline Results\n\n**Created:** "));
    assert_eq!(document.matches("### Task ").count(), 5);
    assert!(document.contains("### Task 1\n\n**Agent:** Lead Market Analyst\n\n**Task:** research_task"));
    assert!(document.contains("output of copy_creation_task"));

    let output_dir = report.output_dir.unwrap();
    assert!(output_dir.starts_with(results.path()));
    let snapshot = fs::read_to_string(output_dir.join("config_info.md")).unwrap();
    assert!(snapshot.contains("**pipeline_type:** standard"));
    assert!(snapshot.contains("**agents_document:** agents.yaml"));
    assert!(!snapshot.contains("inputs_document"));
}

#[tokio::test]
async fn test_no_save_leaves_no_artifacts() {
    let config = tempfile::tempdir().unwrap();
    let results = tempfile::tempdir().unwrap();
    let engine = RecordingEngine::new();
    let runner = runner(config.path(), results.path(), engine.clone());

    let report = runner.run(&RunRequest::new("standard").with_save(false)).await;

    assert!(report.success);
    assert_eq!(report.completed_tasks, 5);
    assert!(report.results_file.is_none());
    assert!(subdirectories(results.path()).is_empty());
}

#[tokio::test]
async fn test_memory_override_reaches_graph() {
    let config = tempfile::tempdir().unwrap();
    let results = tempfile::tempdir().unwrap();
    let engine = RecordingEngine::new();
    let runner = runner(config.path(), results.path(), engine.clone());

    let mut request = RunRequest::new("standard").with_save(false);
    request.memory = Some(true);
    runner.run(&request).await;

    assert!(engine.last_run().memory);
}
