//! Core domain models for crewline
//!
//! This module defines configuration documents, pipeline configuration,
//! agents, tasks, the pipeline lifecycle and the registry that builds
//! pipelines by type.

pub mod agent;
pub mod config;
pub mod context;
pub mod error;
pub mod pipeline;
pub mod pipeline_config;
pub mod registry;
pub mod result;
pub mod task;

pub use agent::*;
pub use config::{
    AgentsValidator, CacheInfo, ConfigDocument, ConfigStore, DocumentKind, DocumentSource,
    DocumentValidator, FileSource, PipelineInputs, TasksValidator,
};
pub use context::*;
pub use error::PipelineError;
pub use pipeline::*;
pub use pipeline_config::*;
pub use registry::*;
pub use result::*;
pub use task::*;
