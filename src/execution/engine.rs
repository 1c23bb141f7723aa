//! Sequential execution engine - runs every task of a graph in order

use crate::core::{PipelineContext, PipelineGraph, PipelineInputs, TaskOutput};
use crate::execution::{ExecutionEngine, TaskExecutor};
use crate::tools::ToolBox;
use anyhow::Context;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Events that can occur during a run
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    RunStarted {
        run_id: Uuid,
        pipeline: String,
        total_tasks: usize,
    },
    TaskStarted {
        index: usize,
        task: String,
        agent: String,
    },
    ToolUsed {
        task: String,
        tool: String,
    },
    TaskCompleted {
        index: usize,
        task: String,
        output_chars: usize,
    },
    TaskFailed {
        task: String,
        error: String,
    },
    RunCompleted {
        run_id: Uuid,
        completed_tasks: usize,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(ExecutionEvent) + Send + Sync>;

/// Runs tasks one at a time, in declared order
///
/// No retries and no timeout beyond the backend client's own. The first
/// failing task aborts the run.
pub struct SequentialEngine {
    executor: TaskExecutor,
    event_handlers: Vec<EventHandler>,
}

impl SequentialEngine {
    pub fn new(toolbox: ToolBox) -> Self {
        Self {
            executor: TaskExecutor::new(toolbox),
            event_handlers: Vec::new(),
        }
    }

    /// Add an event handler
    pub fn with_event_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(ExecutionEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
        self
    }

    fn emit_event(&self, event: ExecutionEvent) {
        for handler in &self.event_handlers {
            handler(event.clone());
        }
    }
}

#[async_trait]
impl ExecutionEngine for SequentialEngine {
    async fn run(
        &self,
        graph: &PipelineGraph,
        inputs: &PipelineInputs,
    ) -> anyhow::Result<Vec<TaskOutput>> {
        let mut context = PipelineContext::new(inputs.clone());
        let run_id = context.run_id;

        info!("Starting run {} of pipeline {}", run_id, graph.label);
        self.emit_event(ExecutionEvent::RunStarted {
            run_id,
            pipeline: graph.label.clone(),
            total_tasks: graph.tasks.len(),
        });

        let mut outputs = Vec::with_capacity(graph.tasks.len());

        for (index, task) in graph.tasks.iter().enumerate() {
            self.emit_event(ExecutionEvent::TaskStarted {
                index,
                task: task.name.clone(),
                agent: task.agent.role.clone(),
            });

            let on_tool = |tool: &str| {
                self.emit_event(ExecutionEvent::ToolUsed {
                    task: task.name.clone(),
                    tool: tool.to_string(),
                })
            };

            let answer = match self
                .executor
                .execute(task, graph.backend.as_ref(), &context, graph.memory, &on_tool)
                .await
            {
                Ok(answer) => answer,
                Err(e) => {
                    error!("Task {} failed: {}", task.name, e);
                    self.emit_event(ExecutionEvent::TaskFailed {
                        task: task.name.clone(),
                        error: e.to_string(),
                    });
                    return Err(e).with_context(|| format!("task '{}' failed", task.name));
                }
            };

            info!("Task {} completed ({} chars)", task.name, answer.len());
            self.emit_event(ExecutionEvent::TaskCompleted {
                index,
                task: task.name.clone(),
                output_chars: answer.chars().count(),
            });

            context.set_task_output(&task.name, answer.clone());
            outputs.push(
                TaskOutput::new()
                    .with_agent(task.agent.role.clone())
                    .with_name(task.name.clone())
                    .with_raw(answer),
            );
        }

        self.emit_event(ExecutionEvent::RunCompleted {
            run_id,
            completed_tasks: context.completed_tasks(),
        });

        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{GenerationError, TextGenerator};
    use crate::core::{AgentDefinition, ProcessMode, TaskDefinition};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Answers with the task name found in the prompt, fails on "explode"
    struct NameEcho {
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for NameEcho {
        fn name(&self) -> &str {
            "echo"
        }

        fn model(&self) -> &str {
            "echo-1"
        }

        async fn generate(&self, prompt: &str, _stop: Option<&[String]>) -> Result<String, GenerationError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            if prompt.contains("explode") {
                return Err(GenerationError::Request("boom".to_string()));
            }
            Ok(format!("Final Answer: answer {}", n + 1))
        }
    }

    fn graph(backend: Arc<NameEcho>, descriptions: &[&str], memory: bool) -> PipelineGraph {
        let agent = AgentDefinition::new("Writer", "Write", "Journalist");
        let mut tasks: Vec<TaskDefinition> = Vec::new();
        for (i, description) in descriptions.iter().enumerate() {
            let deps = if i == 2 { vec![tasks[0].clone()] } else { vec![] };
            tasks.push(
                TaskDefinition::new(format!("task_{}", i + 1), *description, "Text", agent.clone())
                    .with_dependencies(deps),
            );
        }
        PipelineGraph {
            label: "test".to_string(),
            agents: vec![agent],
            tasks,
            process: ProcessMode::Sequential,
            verbose: false,
            memory,
            backend,
        }
    }

    fn backend() -> Arc<NameEcho> {
        Arc::new(NameEcho {
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn test_runs_tasks_in_order() {
        let backend = backend();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let engine = SequentialEngine::new(ToolBox::new())
            .with_event_handler(move |event| sink.lock().unwrap().push(event));

        let graph = graph(Arc::clone(&backend), &["first", "second", "third"], false);
        let outputs = engine.run(&graph, &PipelineInputs::new()).await.unwrap();

        let raws: Vec<_> = outputs.iter().map(|o| o.raw.clone().unwrap()).collect();
        assert_eq!(raws, vec!["answer 1", "answer 2", "answer 3"]);
        assert_eq!(outputs[0].agent.as_deref(), Some("Writer"));
        assert_eq!(outputs[2].name.as_deref(), Some("task_3"));

        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[2].contains("## Output of task_1\nanswer 1"));
        assert!(!prompts[2].contains("answer 2"));

        let events = events.lock().unwrap();
        assert!(matches!(events.first(), Some(ExecutionEvent::RunStarted { total_tasks: 3, .. })));
        assert!(matches!(events.last(), Some(ExecutionEvent::RunCompleted { completed_tasks: 3, .. })));
    }

    #[tokio::test]
    async fn test_memory_includes_all_earlier_outputs() {
        let backend = backend();
        let engine = SequentialEngine::new(ToolBox::new());

        let graph = graph(Arc::clone(&backend), &["first", "second", "third"], true);
        engine.run(&graph, &PipelineInputs::new()).await.unwrap();

        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[2].contains("answer 1"));
        assert!(prompts[2].contains("answer 2"));
    }

    #[tokio::test]
    async fn test_failure_stops_run() {
        let backend = backend();
        let engine = SequentialEngine::new(ToolBox::new());

        let graph = graph(Arc::clone(&backend), &["first", "explode", "never"], false);
        let err = engine.run(&graph, &PipelineInputs::new()).await.unwrap_err();

        assert!(err.to_string().contains("task 'task_2' failed"));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    }
}
