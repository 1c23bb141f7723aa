//! Test: End to End - sequential engine against a mocked backend

use crate::helpers::*;
use crewline::backend::BackendResolver;
use crewline::core::PipelineRegistry;
use crewline::execution::SequentialEngine;
use crewline::persistence::ResultWriter;
use crewline::runner::{PipelineRunner, RunRequest};
use crewline::tools::ToolBox;
use std::fs;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn runner_against(server: &MockServer, config: &std::path::Path, results: &std::path::Path) -> PipelineRunner {
    write_shipped_documents(config);
    let (store, env) = environment_with(
        config,
        BackendResolver::with_api_key("test-key").with_base_url(server.uri()),
    );
    PipelineRunner::new(
        PipelineRegistry::with_builtin_pipelines(env),
        store,
        Arc::new(SequentialEngine::new(ToolBox::new())),
        ResultWriter::new(results),
    )
}

#[tokio::test]
async fn test_standard_run_against_backend() {
    let server = mock_backend("Thought: I now know the final answer\nFinal Answer: Launch copy ready").await;
    let config = tempfile::tempdir().unwrap();
    let results = tempfile::tempdir().unwrap();
    let runner = runner_against(&server, config.path(), results.path());

    let request = RunRequest::new("standard")
        .with_input("project_description", "A solar kettle")
        .with_input("customer_domain", "kettle.example");
    let report = runner.run(&request).await;

    assert!(report.success, "{:?}", report.error);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 5);

    let first: serde_json::Value = requests[0].body_json().unwrap();
    assert_eq!(first["model"], "deepseek-reasoner");
    assert_eq!(first["stop"], serde_json::json!(["Observation:"]));
    let prompt = first["messages"][0]["content"].as_str().unwrap();
    assert!(prompt.contains("You are Lead Market Analyst."));
    assert!(prompt.contains("A solar kettle"));

    let last: serde_json::Value = requests[4].body_json().unwrap();
    let prompt = last["messages"][0]["content"].as_str().unwrap();
    assert!(prompt.contains("## Output of marketing_strategy_task\nLaunch copy ready"));
    assert!(prompt.contains("## Output of campaign_idea_task"));
    assert!(!prompt.contains("## Output of research_task"));

    let document = fs::read_to_string(report.results_file.unwrap()).unwrap();
    assert_eq!(document.matches("Launch copy ready").count(), 5);
}

#[tokio::test]
async fn test_backend_error_becomes_error_report() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;
    let config = tempfile::tempdir().unwrap();
    let results = tempfile::tempdir().unwrap();
    let runner = runner_against(&server, config.path(), results.path());

    let report = runner.run(&RunRequest::new("standard")).await;

    assert!(!report.success);
    let error = report.error.unwrap();
    assert!(error.contains("task 'research_task' failed"));
    assert!(error.contains("backend API error: 500 - upstream down"));
    let text = fs::read_to_string(report.error_report.unwrap()).unwrap();
    assert!(text.contains("**Pipeline:** standard"));
    assert!(text.contains("500 - upstream down"));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
