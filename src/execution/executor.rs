//! Task executor - runs one task with its agent against the backend

use crate::backend::{GenerationError, TextGenerator};
use crate::core::{PipelineContext, TaskDefinition};
use crate::tools::{Tool, ToolBox};
use regex::Regex;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Stop sequence that hands control back after an `Action Input:` line
pub const OBSERVATION_MARKER: &str = "Observation:";

/// Marker that ends the tool loop
pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";

/// What the agent asked for in one reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentReply {
    /// The agent is done
    FinalAnswer(String),
    /// The agent wants to call a tool
    Action { tool: String, input: String },
    /// Neither marker was found; the whole reply is the answer
    Plain(String),
}

impl AgentReply {
    /// Parse a reply; a final answer wins over an action
    pub fn parse(text: &str) -> Self {
        if let Some(pos) = text.find(FINAL_ANSWER_MARKER) {
            let answer = text[pos + FINAL_ANSWER_MARKER.len()..].trim();
            return AgentReply::FinalAnswer(answer.to_string());
        }

        if let Some(caps) = action_regex().captures(text) {
            let input = caps[2].trim().trim_matches('"').to_string();
            return AgentReply::Action {
                tool: caps[1].trim().to_string(),
                input,
            };
        }

        AgentReply::Plain(text.trim().to_string())
    }
}

fn action_regex() -> &'static Regex {
    static ACTION: OnceLock<Regex> = OnceLock::new();
    ACTION.get_or_init(|| {
        Regex::new(r"(?s)Action:\s*(.+?)\s*\n\s*Action Input:\s*(.*?)\s*$").expect("action regex is valid")
    })
}

/// Runs a single task to its final answer
pub struct TaskExecutor {
    toolbox: ToolBox,
    max_iterations: usize,
}

impl TaskExecutor {
    pub fn new(toolbox: ToolBox) -> Self {
        Self {
            toolbox,
            max_iterations: 5,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Build the first prompt for a task
    pub fn build_prompt(
        task: &TaskDefinition,
        tools: &[Arc<dyn Tool>],
        context: &PipelineContext,
        use_memory: bool,
    ) -> String {
        let agent = &task.agent;
        let mut prompt = format!(
            "You are {}. {}\nYour personal goal is: {}\n",
            agent.role, agent.backstory, agent.goal
        );

        if !tools.is_empty() {
            prompt.push_str("\nYou can use these tools:\n");
            for tool in tools {
                prompt.push_str(&format!("- {}: {}\n", tool.name(), tool.description()));
            }
            prompt.push_str(&format!(
                "\nTo use a tool, reply with:\nThought: <your reasoning>\nAction: <tool name>\nAction Input: <input>\n\n\
                 When you know the answer, reply with:\nThought: I now know the final answer\n{} <your answer>\n",
                FINAL_ANSWER_MARKER
            ));
        }

        prompt.push_str(&format!(
            "\nCurrent task: {}\n\nThis is the expected criteria for your final answer: {}\n",
            task.render_description(&context.inputs),
            task.expected_output
        ));

        let earlier = context.context_for(task, use_memory);
        if !earlier.is_empty() {
            prompt.push_str(&format!(
                "\nThis is the context you are working with:\n{}\n",
                earlier
            ));
        }

        prompt.push_str("\nBegin! Give your best complete final answer.\n");
        prompt
    }

    /// Run the tool loop until the agent gives a final answer
    ///
    /// `on_tool` is called with the tool name before each tool call.
    pub async fn execute(
        &self,
        task: &TaskDefinition,
        backend: &dyn TextGenerator,
        context: &PipelineContext,
        use_memory: bool,
        on_tool: &(dyn Fn(&str) + Send + Sync),
    ) -> Result<String, GenerationError> {
        info!("Executing task: {}", task.name);

        let tools = self.toolbox.for_agent(&task.agent);
        let mut transcript = Self::build_prompt(task, &tools, context, use_memory);
        debug!("Prompt for task {}: {}", task.name, transcript);

        let stop = vec![OBSERVATION_MARKER.to_string()];

        for iteration in 0..=self.max_iterations {
            if iteration == self.max_iterations {
                transcript.push_str(&format!(
                    "\nYou have used all your tool calls. Reply now with {} followed by your answer.\n",
                    FINAL_ANSWER_MARKER
                ));
            }

            let reply = backend.generate(&transcript, Some(&stop)).await?;
            debug!("Reply for task {} ({} chars)", task.name, reply.len());

            match AgentReply::parse(&reply) {
                AgentReply::FinalAnswer(answer) | AgentReply::Plain(answer) => {
                    return Ok(answer);
                }
                AgentReply::Action { .. } if iteration == self.max_iterations => {
                    warn!("Task {} still calling tools after {} iterations", task.name, iteration);
                    return Ok(reply.trim().to_string());
                }
                AgentReply::Action { tool, input } => {
                    on_tool(&tool);
                    let observation = match tools.iter().find(|t| t.name() == tool) {
                        Some(t) => t.invoke(&input).await,
                        None => format!(
                            "Tool '{}' is not available. Available tools: {}",
                            tool,
                            tools.iter().map(|t| t.name()).collect::<Vec<_>>().join(", ")
                        ),
                    };
                    transcript.push_str(reply.trim_end());
                    transcript.push_str(&format!("\n{} {}\n", OBSERVATION_MARKER, observation));
                }
            }
        }

        // The last iteration always returns
        Ok(String::new())
    }
}
