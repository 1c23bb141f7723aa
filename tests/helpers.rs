//! Test utility functions for crewline

#![allow(dead_code)]

use async_trait::async_trait;
use crewline::backend::BackendResolver;
use crewline::core::{
    ConfigStore, PipelineEnvironment, PipelineGraph, PipelineInputs, PipelineRegistry, TaskOutput,
};
use crewline::execution::ExecutionEngine;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Shipped configuration documents, by file name
pub const SHIPPED_DOCUMENTS: [(&str, &str); 5] = [
    ("agents.yaml", include_str!("../config/agents.yaml")),
    ("tasks.yaml", include_str!("../config/tasks.yaml")),
    ("agents_extended.yaml", include_str!("../config/agents_extended.yaml")),
    ("tasks_extended.yaml", include_str!("../config/tasks_extended.yaml")),
    ("inputs_extended.yaml", include_str!("../config/inputs_extended.yaml")),
];

/// Copy the shipped documents into `dir`
pub fn write_shipped_documents(dir: &Path) {
    for (name, content) in SHIPPED_DOCUMENTS {
        fs::write(dir.join(name), content).unwrap();
    }
}

/// Store and environment over `dir` with a fixed API key
pub fn environment(dir: &Path) -> (Arc<ConfigStore>, Arc<PipelineEnvironment>) {
    environment_with(dir, BackendResolver::with_api_key("test-key"))
}

pub fn environment_with(
    dir: &Path,
    backends: BackendResolver,
) -> (Arc<ConfigStore>, Arc<PipelineEnvironment>) {
    let store = Arc::new(ConfigStore::from_dir(dir));
    let env = Arc::new(PipelineEnvironment::new(Arc::clone(&store), backends));
    (store, env)
}

/// Registry with the built-in types over `dir`
pub fn builtin_registry(dir: &Path) -> (Arc<ConfigStore>, PipelineRegistry) {
    let (store, env) = environment(dir);
    (store, PipelineRegistry::with_builtin_pipelines(env))
}

/// What a recording engine saw for one run
#[derive(Debug, Clone)]
pub struct RecordedRun {
    pub label: String,
    pub tasks: Vec<String>,
    pub inputs: PipelineInputs,
    pub memory: bool,
}

/// Engine that records the graph and answers every task with a fixed text
#[derive(Default)]
pub struct RecordingEngine {
    pub runs: Mutex<Vec<RecordedRun>>,
}

impl RecordingEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn last_run(&self) -> RecordedRun {
        self.runs.lock().unwrap().last().cloned().expect("engine was not run")
    }
}

#[async_trait]
impl ExecutionEngine for RecordingEngine {
    async fn run(
        &self,
        graph: &PipelineGraph,
        inputs: &PipelineInputs,
    ) -> anyhow::Result<Vec<TaskOutput>> {
        self.runs.lock().unwrap().push(RecordedRun {
            label: graph.label.clone(),
            tasks: graph.task_names().into_iter().map(String::from).collect(),
            inputs: inputs.clone(),
            memory: graph.memory,
        });

        Ok(graph
            .tasks
            .iter()
            .map(|task| {
                TaskOutput::new()
                    .with_agent(task.agent.role.clone())
                    .with_name(task.name.clone())
                    .with_raw(format!("output of {}", task.name))
            })
            .collect())
    }
}

/// Engine that always fails
pub struct FailingEngine(pub &'static str);

#[async_trait]
impl ExecutionEngine for FailingEngine {
    async fn run(
        &self,
        _graph: &PipelineGraph,
        _inputs: &PipelineInputs,
    ) -> anyhow::Result<Vec<TaskOutput>> {
        Err(anyhow::anyhow!(self.0))
    }
}

/// Chat completion body with a single answer
pub fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
    })
}

/// Backend server answering every chat completion with `content`
pub async fn mock_backend(content: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(content)))
        .mount(&server)
        .await;
    server
}

/// Directories directly below `dir`
pub fn subdirectories(dir: &Path) -> Vec<std::path::PathBuf> {
    match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Files in `dir` whose name starts with `prefix`
pub fn files_with_prefix(dir: &Path, prefix: &str) -> Vec<std::path::PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix))
        })
        .collect()
}
