//! Pipeline configuration value object and its builder

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend provider used when none is given
pub const DEFAULT_BACKEND_PROVIDER: &str = "deepseek";

/// Agents document of the standard preset
pub const STANDARD_AGENTS_DOCUMENT: &str = "agents.yaml";

/// Tasks document of the standard preset
pub const STANDARD_TASKS_DOCUMENT: &str = "tasks.yaml";

/// Agents document of the extended preset
pub const EXTENDED_AGENTS_DOCUMENT: &str = "agents_extended.yaml";

/// Tasks document of the extended preset
pub const EXTENDED_TASKS_DOCUMENT: &str = "tasks_extended.yaml";

/// Which backend, documents and flags a pipeline instance uses
///
/// Only [`PipelineConfigurationBuilder::build`] produces values of this type;
/// there are no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfiguration {
    backend_provider: String,
    backend_model: Option<String>,
    agents_document: String,
    tasks_document: String,
    verbose: bool,
    use_memory: bool,
}

impl PipelineConfiguration {
    pub fn builder() -> PipelineConfigurationBuilder {
        PipelineConfigurationBuilder::new()
    }

    pub fn backend_provider(&self) -> &str {
        &self.backend_provider
    }

    pub fn backend_model(&self) -> Option<&str> {
        self.backend_model.as_deref()
    }

    pub fn agents_document(&self) -> &str {
        &self.agents_document
    }

    pub fn tasks_document(&self) -> &str {
        &self.tasks_document
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn use_memory(&self) -> bool {
        self.use_memory
    }
}

/// Named starting points for the builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Preset {
    /// Default agent and task documents
    #[default]
    Standard,
    /// Extended agent and task documents
    Extended,
}

impl Preset {
    pub fn builder(self) -> PipelineConfigurationBuilder {
        match self {
            Preset::Standard => PipelineConfigurationBuilder::standard(),
            Preset::Extended => PipelineConfigurationBuilder::extended(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preset::Standard => f.write_str("standard"),
            Preset::Extended => f.write_str("extended"),
        }
    }
}

/// Fluent builder for [`PipelineConfiguration`]
#[derive(Debug, Clone)]
pub struct PipelineConfigurationBuilder {
    backend_provider: String,
    backend_model: Option<String>,
    agents_document: String,
    tasks_document: String,
    verbose: bool,
    use_memory: bool,
}

impl PipelineConfigurationBuilder {
    /// Start from the standard preset
    pub fn new() -> Self {
        Self {
            backend_provider: DEFAULT_BACKEND_PROVIDER.to_string(),
            backend_model: None,
            agents_document: STANDARD_AGENTS_DOCUMENT.to_string(),
            tasks_document: STANDARD_TASKS_DOCUMENT.to_string(),
            verbose: true,
            use_memory: false,
        }
    }

    pub fn standard() -> Self {
        Self::new()
    }

    /// Same backend defaults, alternate documents
    pub fn extended() -> Self {
        Self::new()
            .with_agents_document(EXTENDED_AGENTS_DOCUMENT)
            .with_tasks_document(EXTENDED_TASKS_DOCUMENT)
    }

    pub fn with_backend_provider(mut self, provider: impl Into<String>) -> Self {
        self.backend_provider = provider.into();
        self
    }

    pub fn with_backend_model(mut self, model: impl Into<String>) -> Self {
        self.backend_model = Some(model.into());
        self
    }

    pub fn with_agents_document(mut self, document: impl Into<String>) -> Self {
        self.agents_document = document.into();
        self
    }

    pub fn with_tasks_document(mut self, document: impl Into<String>) -> Self {
        self.tasks_document = document.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_memory(mut self, use_memory: bool) -> Self {
        self.use_memory = use_memory;
        self
    }

    pub fn build(self) -> PipelineConfiguration {
        PipelineConfiguration {
            backend_provider: self.backend_provider,
            backend_model: self.backend_model,
            agents_document: self.agents_document,
            tasks_document: self.tasks_document,
            verbose: self.verbose,
            use_memory: self.use_memory,
        }
    }
}

impl Default for PipelineConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
