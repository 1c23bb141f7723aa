//! Tools agents can call while working on a task
//!
//! A tool takes a single text input and returns text. Failures never escape
//! the tool boundary: [`Tool::invoke`] turns them into a readable message so
//! a broken tool degrades the answer instead of aborting the run.

pub mod page_fetch;
pub mod web_search;

use crate::core::{AgentDefinition, Capability};
use async_trait::async_trait;
pub use page_fetch::PageFetchTool;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;
pub use web_search::WebSearchTool;

/// Error types for tool execution
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("tool is not configured: {0}")]
    NotConfigured(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

/// A named callable capability
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name used in `Action:` lines
    fn name(&self) -> &str;

    /// One-line description shown to the agent
    fn description(&self) -> &str;

    /// Run the tool
    async fn execute(&self, input: &str) -> Result<String, ToolError>;

    /// Run the tool, converting any failure into text
    async fn invoke(&self, input: &str) -> String {
        match self.execute(input).await {
            Ok(output) => output,
            Err(e) => {
                warn!("Tool {} failed: {}", self.name(), e);
                format!("Error while using {}: {}", self.name(), e)
            }
        }
    }
}

/// Tools available to agents, keyed by capability
#[derive(Clone, Default)]
pub struct ToolBox {
    tools: HashMap<Capability, Arc<dyn Tool>>,
}

impl ToolBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Web search (key from `SERPER_API_KEY`, limit from `SERPER_MAX_RESULTS`) and page fetch
    pub fn from_env() -> Self {
        let limit = std::env::var(web_search::SERPER_MAX_RESULTS_VAR).ok();
        let mut search = WebSearchTool::from_env();
        match web_search::parse_max_results(limit.as_deref()) {
            Some(max_results) => search = search.with_max_results(max_results),
            None if limit.is_some() => warn!(
                "Ignoring {}={:?}, keeping {} results",
                web_search::SERPER_MAX_RESULTS_VAR,
                limit.as_deref().unwrap_or_default(),
                web_search::DEFAULT_MAX_RESULTS
            ),
            None => {}
        }

        Self::new()
            .with_tool(Capability::WebSearch, Arc::new(search))
            .with_tool(Capability::PageFetch, Arc::new(PageFetchTool::new()))
    }

    pub fn with_tool(mut self, capability: Capability, tool: Arc<dyn Tool>) -> Self {
        self.tools.insert(capability, tool);
        self
    }

    pub fn get(&self, capability: Capability) -> Option<Arc<dyn Tool>> {
        self.tools.get(&capability).cloned()
    }

    /// Tools granted to an agent, in capability order
    pub fn for_agent(&self, agent: &AgentDefinition) -> Vec<Arc<dyn Tool>> {
        agent
            .capabilities
            .iter()
            .filter_map(|capability| self.get(*capability))
            .collect()
    }
}

impl fmt::Debug for ToolBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.tools.values().map(|t| t.name().to_string()).collect();
        names.sort();
        f.debug_struct("ToolBox").field("tools", &names).finish()
    }
}
