//! Pipeline lifecycle and the assembled task graph
//!
//! Construction always runs in the same order (see [`construct`]): the
//! configuration is stored, a backend is resolved, then the variant's
//! `validate_config` and `initialize` hooks run. Variants supply their agent
//! roster and task sequence; [`Pipeline::assemble`] and
//! [`Pipeline::execute`] are shared.

use crate::backend::{BackendResolver, TextGenerator};
use crate::core::agent::AgentDefinition;
use crate::core::config::{ConfigStore, PipelineInputs};
use crate::core::error::PipelineError;
use crate::core::pipeline_config::PipelineConfiguration;
use crate::core::result::TaskOutput;
use crate::core::task::{check_task_order, TaskDefinition};
use crate::execution::ExecutionEngine;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// How the engine walks the task sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessMode {
    /// One task at a time, in declared order
    Sequential,
}

/// State every pipeline carries after construction
#[derive(Clone)]
pub struct PipelineBase {
    config: PipelineConfiguration,
    backend: Arc<dyn TextGenerator>,
}

impl PipelineBase {
    pub fn config(&self) -> &PipelineConfiguration {
        &self.config
    }

    pub fn backend(&self) -> Arc<dyn TextGenerator> {
        Arc::clone(&self.backend)
    }
}

impl fmt::Debug for PipelineBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineBase")
            .field("config", &self.config)
            .field("backend", &self.backend.name())
            .field("model", &self.backend.model())
            .finish()
    }
}

/// An executable graph of agents and tasks
#[derive(Clone)]
pub struct PipelineGraph {
    /// Pipeline type label
    pub label: String,

    /// Agent roster in declared order
    pub agents: Vec<AgentDefinition>,

    /// Task sequence in declared order
    pub tasks: Vec<TaskDefinition>,

    pub process: ProcessMode,

    pub verbose: bool,

    /// When set, every earlier output is handed to later tasks
    pub memory: bool,

    /// Backend the agents consult
    pub backend: Arc<dyn TextGenerator>,
}

impl PipelineGraph {
    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.name.as_str()).collect()
    }
}

impl fmt::Debug for PipelineGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineGraph")
            .field("label", &self.label)
            .field("agents", &self.agents.len())
            .field("tasks", &self.task_names())
            .field("process", &self.process)
            .field("verbose", &self.verbose)
            .field("memory", &self.memory)
            .field("backend", &self.backend.name())
            .finish()
    }
}

/// A named catalog of agents and a dependency-ordered task sequence
#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Shared construction state
    fn base(&self) -> &PipelineBase;

    /// Pipeline type label (e.g. `standard`)
    fn label(&self) -> &str;

    /// Variant-specific configuration checks, run once during construction
    fn validate_config(&self) -> Result<(), PipelineError> {
        Ok(())
    }

    /// Variant-local preparation, run once after `validate_config`
    fn initialize(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }

    /// Full agent roster in a fixed order
    fn agents(&self) -> Result<Vec<AgentDefinition>, PipelineError> {
        Err(PipelineError::NotImplemented("agents"))
    }

    /// Full task sequence; every dependency must appear earlier
    fn tasks(&self) -> Result<Vec<TaskDefinition>, PipelineError> {
        Err(PipelineError::NotImplemented("tasks"))
    }

    fn config(&self) -> &PipelineConfiguration {
        self.base().config()
    }

    /// Compose agents and tasks into a sequential graph
    ///
    /// Re-derives both catalogs on every call and rejects a task sequence
    /// whose dependencies are not declared earlier.
    fn assemble(&self) -> Result<PipelineGraph, PipelineError> {
        let agents = self.agents()?;
        let tasks = self.tasks()?;
        check_task_order(&tasks)?;

        let config = self.config();
        Ok(PipelineGraph {
            label: self.label().to_string(),
            agents,
            tasks,
            process: ProcessMode::Sequential,
            verbose: config.verbose(),
            memory: config.use_memory(),
            backend: self.base().backend(),
        })
    }

    /// Ordered key/value description of this pipeline
    fn config_info(&self) -> IndexMap<String, String> {
        let config = self.config();
        let mut info = IndexMap::new();
        info.insert("pipeline_type".to_string(), self.label().to_string());
        info.insert(
            "backend_provider".to_string(),
            config.backend_provider().to_string(),
        );
        info.insert(
            "backend_model".to_string(),
            self.base().backend.model().to_string(),
        );
        info.insert(
            "agents_document".to_string(),
            config.agents_document().to_string(),
        );
        info.insert(
            "tasks_document".to_string(),
            config.tasks_document().to_string(),
        );
        info.insert("verbose".to_string(), config.verbose().to_string());
        info.insert("memory".to_string(), config.use_memory().to_string());
        info
    }

    /// Assemble the graph and hand it to the engine
    ///
    /// The engine's ordered output is returned unchanged. Engine failures
    /// are wrapped, never retried.
    async fn execute(
        &self,
        engine: &dyn ExecutionEngine,
        inputs: &PipelineInputs,
    ) -> Result<Vec<TaskOutput>, PipelineError> {
        let graph = self.assemble()?;
        info!(
            "Executing pipeline '{}' with {} agents and {} tasks",
            graph.label,
            graph.agents.len(),
            graph.tasks.len()
        );
        engine
            .run(&graph, inputs)
            .await
            .map_err(PipelineError::EngineExecution)
    }
}

/// A concrete pipeline that [`construct`] can build
pub trait PipelineVariant: Pipeline + Sized + 'static {
    /// Wrap the construction state; must not perform I/O
    fn from_parts(base: PipelineBase, store: Arc<ConfigStore>) -> Self;
}

/// Everything a constructor needs besides the configuration
#[derive(Debug)]
pub struct PipelineEnvironment {
    pub store: Arc<ConfigStore>,
    pub backends: BackendResolver,
}

impl PipelineEnvironment {
    pub fn new(store: Arc<ConfigStore>, backends: BackendResolver) -> Self {
        Self { store, backends }
    }
}

/// Build a variant in the fixed construction order
pub fn construct<V: PipelineVariant>(
    config: PipelineConfiguration,
    env: &PipelineEnvironment,
) -> Result<V, PipelineError> {
    let backend = env
        .backends
        .resolve(config.backend_provider(), config.backend_model())?;
    debug!(
        "Constructing pipeline with backend {} ({})",
        backend.name(),
        backend.model()
    );

    let base = PipelineBase { config, backend };
    let mut pipeline = V::from_parts(base, Arc::clone(&env.store));
    pipeline.validate_config()?;
    pipeline.initialize()?;
    Ok(pipeline)
}
