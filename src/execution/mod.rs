//! Pipeline execution engines

pub mod engine;
pub mod executor;

use crate::core::{PipelineGraph, PipelineInputs, TaskOutput};
use async_trait::async_trait;
pub use engine::{EventHandler, ExecutionEvent, SequentialEngine};
pub use executor::{AgentReply, TaskExecutor};

/// Runs an assembled graph and returns one output per task, in order
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    async fn run(
        &self,
        graph: &PipelineGraph,
        inputs: &PipelineInputs,
    ) -> anyhow::Result<Vec<TaskOutput>>;
}
