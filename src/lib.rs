//! crewline - multi-agent content pipelines driven by YAML role and task documents

pub mod backend;
pub mod cli;
pub mod core;
pub mod execution;
pub mod persistence;
pub mod runner;
pub mod tools;
pub mod variants;

// Re-export commonly used types
pub use backend::{BackendResolver, DeepSeekClient, GenerationError, TextGenerator};
pub use core::{
    ConfigStore, Pipeline, PipelineConfiguration, PipelineError, PipelineRegistry, Preset,
    RunResults, TaskOutput,
};
pub use execution::{ExecutionEngine, ExecutionEvent, SequentialEngine};
pub use persistence::ResultWriter;
pub use runner::{PipelineRunner, RunReport, RunRequest};
pub use tools::ToolBox;
pub use variants::{ExtendedPipeline, StandardPipeline};
