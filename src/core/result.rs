//! Result shapes produced by execution engines

use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-task output as returned by an execution engine
///
/// Engines fill whichever fields they have. Every field is optional and the
/// normalizer decides which one carries the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutput {
    /// Display name of the agent that produced the output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,

    /// Task name or description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Raw text of the final answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,

    /// Structured result rendered as text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    /// Legacy output field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl TaskOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = Some(raw.into());
        self
    }

    pub fn with_result(mut self, result: impl Into<String>) -> Self {
        self.result = Some(result.into());
        self
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }
}

impl fmt::Display for TaskOutput {
    /// Full string conversion: the JSON form of the whole object
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "TaskOutput({})", json),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}

/// Which field of a [`TaskOutput`] supplied the body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    Raw,
    Result,
    Output,
    Stringified,
}

/// A normalized task result, ready to be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResult {
    pub agent_name: Option<String>,
    pub task_name: Option<String>,
    pub body: String,
    pub source_kind: SourceKind,
}

/// What a run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunResults {
    /// Ordered per-task outputs
    Tasks(Vec<TaskOutput>),
    /// A single opaque result with no per-task breakdown
    Overall(String),
}

impl From<Vec<TaskOutput>> for RunResults {
    fn from(outputs: Vec<TaskOutput>) -> Self {
        RunResults::Tasks(outputs)
    }
}
