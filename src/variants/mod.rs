//! Concrete pipeline catalogs
//!
//! Each variant declares one accessor per agent role and one per task.
//! Accessors read their text from the configured documents and fall back to
//! a literal default for any entry or field the document does not provide.

pub mod extended;
pub mod standard;

pub use extended::ExtendedPipeline;
pub use standard::StandardPipeline;

use crate::core::{AgentDefinition, ConfigDocument, PipelineConfiguration, PipelineError, TaskDefinition};

/// Fallback text for an agent entry
#[derive(Debug, Clone, Copy)]
pub(crate) struct RoleDefaults {
    pub role: &'static str,
    pub goal: &'static str,
    pub backstory: &'static str,
}

/// Fallback text for a task entry
#[derive(Debug, Clone, Copy)]
pub(crate) struct TaskDefaults {
    pub description: &'static str,
    pub expected_output: &'static str,
}

// Folded YAML scalars keep their trailing newline
fn text(doc: &ConfigDocument, key: &str, field: &str, default: &str) -> String {
    doc.field(key, field, default).trim().to_string()
}

pub(crate) fn agent_from(doc: &ConfigDocument, key: &str, defaults: &RoleDefaults) -> AgentDefinition {
    AgentDefinition::new(
        text(doc, key, "role", defaults.role),
        text(doc, key, "goal", defaults.goal),
        text(doc, key, "backstory", defaults.backstory),
    )
}

pub(crate) fn task_from(
    doc: &ConfigDocument,
    key: &str,
    defaults: &TaskDefaults,
    agent: AgentDefinition,
) -> TaskDefinition {
    TaskDefinition::new(
        key,
        text(doc, key, "description", defaults.description),
        text(doc, key, "expected_output", defaults.expected_output),
        agent,
    )
}

/// Both document references must be non-empty
pub(crate) fn require_documents(config: &PipelineConfiguration) -> Result<(), PipelineError> {
    if config.agents_document().trim().is_empty() || config.tasks_document().trim().is_empty() {
        return Err(PipelineError::InvalidConfiguration(
            "both the agents and the tasks document must be set".to_string(),
        ));
    }
    Ok(())
}
