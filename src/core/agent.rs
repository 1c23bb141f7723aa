//! Agent domain model

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A tool an agent may invoke while working on a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Search the web for a query
    WebSearch,
    /// Fetch a page by URL
    PageFetch,
}

impl Capability {
    /// Tool name the agent uses in its `Action:` lines
    pub fn tool_name(&self) -> &'static str {
        match self {
            Capability::WebSearch => "web_search",
            Capability::PageFetch => "fetch_page",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tool_name())
    }
}

/// A role-specialized worker
///
/// Variants build a fresh value on every access, so there is no shared
/// mutable identity between two calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDefinition {
    /// Short role title, also used as the agent's display name
    pub role: String,

    /// What the agent is trying to achieve
    pub goal: String,

    /// Persona background
    pub backstory: String,

    /// Tools this agent can call
    pub capabilities: BTreeSet<Capability>,

    /// Whether the agent may hand work to other agents
    pub allow_delegation: bool,
}

impl AgentDefinition {
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            capabilities: BTreeSet::new(),
            allow_delegation: false,
        }
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    pub fn with_delegation(mut self, allow: bool) -> Self {
        self.allow_delegation = allow;
        self
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}
