//! Task domain model

use crate::core::agent::AgentDefinition;
use crate::core::config::PipelineInputs;
use crate::core::error::PipelineError;
use regex::{Captures, Regex};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// A unit of work bound to an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDefinition {
    /// Catalog name of the task (e.g. `research_task`)
    pub name: String,

    /// Task description template; may contain `{{ key }}` placeholders
    pub description: String,

    /// What a finished answer should look like
    pub expected_output: String,

    /// Agent assigned to this task
    pub agent: AgentDefinition,

    /// Earlier tasks whose output is handed to this one as context
    pub depends_on: Vec<TaskDefinition>,
}

impl TaskDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: AgentDefinition,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            expected_output: expected_output.into(),
            agent,
            depends_on: Vec::new(),
        }
    }

    pub fn with_dependencies(mut self, depends_on: Vec<TaskDefinition>) -> Self {
        self.depends_on = depends_on;
        self
    }

    /// Names of the tasks this one depends on, in declared order
    pub fn dependency_names(&self) -> Vec<&str> {
        self.depends_on.iter().map(|t| t.name.as_str()).collect()
    }

    /// Render the description, replacing `{{ key }}` with input values
    ///
    /// Unknown placeholders are left as they are. String values are inserted
    /// without quotes; other JSON values use their compact form.
    pub fn render_description(&self, inputs: &PipelineInputs) -> String {
        placeholder_regex()
            .replace_all(&self.description, |caps: &Captures| {
                match inputs.get(&caps[1]) {
                    Some(serde_json::Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("placeholder regex is valid"))
}

/// Check that every dependency appears strictly earlier in the sequence
///
/// Compares indices only; the sequence is never reordered.
pub fn check_task_order(tasks: &[TaskDefinition]) -> Result<(), PipelineError> {
    let positions: HashMap<&str, usize> = tasks
        .iter()
        .enumerate()
        .map(|(index, task)| (task.name.as_str(), index))
        .collect();

    for (index, task) in tasks.iter().enumerate() {
        for dependency in &task.depends_on {
            match positions.get(dependency.name.as_str()) {
                Some(&dep_index) if dep_index < index => {}
                _ => {
                    return Err(PipelineError::DependencyOrder {
                        task: task.name.clone(),
                        dependency: dependency.name.clone(),
                    })
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn agent() -> AgentDefinition {
        AgentDefinition::new("Writer", "Write", "Journalist")
    }

    fn task(name: &str) -> TaskDefinition {
        TaskDefinition::new(name, "Do {{ topic }}", "Text", agent())
    }

    #[test]
    fn test_render_description() {
        let task = TaskDefinition::new(
            "t",
            "Research {{ project_name }} for {{audience}} on a {{ budget }} budget, see {{ unknown }}",
            "Report",
            agent(),
        );
        let mut inputs = PipelineInputs::new();
        inputs.insert("project_name".to_string(), json!("Moonlight"));
        inputs.insert("audience".to_string(), json!("students"));
        inputs.insert("budget".to_string(), json!(5000));

        assert_eq!(
            task.render_description(&inputs),
            "Research Moonlight for students on a 5000 budget, see {{ unknown }}"
        );
    }

    #[test]
    fn test_valid_order_passes() {
        let first = task("first");
        let second = task("second");
        let third = task("third").with_dependencies(vec![first.clone(), second.clone()]);

        assert!(check_task_order(&[first, second, third]).is_ok());
    }

    #[test]
    fn test_dependency_declared_later_fails() {
        let later = task("later");
        let early = task("early").with_dependencies(vec![later.clone()]);

        match check_task_order(&[early, later]) {
            Err(PipelineError::DependencyOrder { task, dependency }) => {
                assert_eq!(task, "early");
                assert_eq!(dependency, "later");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_missing_dependency_fails() {
        let orphan = task("orphan").with_dependencies(vec![task("ghost")]);
        assert!(check_task_order(&[orphan]).is_err());
    }

    #[test]
    fn test_self_dependency_fails() {
        let looped = task("loop");
        let looped = looped.clone().with_dependencies(vec![looped]);
        assert!(check_task_order(&[looped]).is_err());
    }
}
