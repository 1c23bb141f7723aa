//! Run context - inputs and the outputs of finished tasks

use crate::core::config::PipelineInputs;
use crate::core::task::TaskDefinition;
use indexmap::IndexMap;
use uuid::Uuid;

/// Execution context for one pipeline run
///
/// Holds the run inputs and every finished task's output, in completion
/// order, so later tasks can receive them as context.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    /// Unique run identifier
    pub run_id: Uuid,

    /// Inputs interpolated into task descriptions
    pub inputs: PipelineInputs,

    /// Outputs of completed tasks (task name -> output)
    task_outputs: IndexMap<String, String>,
}

impl PipelineContext {
    pub fn new(inputs: PipelineInputs) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            inputs,
            task_outputs: IndexMap::new(),
        }
    }

    /// Record the output of a task
    pub fn set_task_output(&mut self, task_name: &str, output: String) {
        self.task_outputs.insert(task_name.to_string(), output);
    }

    pub fn task_output(&self, task_name: &str) -> Option<&String> {
        self.task_outputs.get(task_name)
    }

    pub fn completed_tasks(&self) -> usize {
        self.task_outputs.len()
    }

    /// Context block handed to a task
    ///
    /// With memory off only declared dependencies are included. With memory
    /// on every earlier output is included, dependencies or not.
    pub fn context_for(&self, task: &TaskDefinition, use_memory: bool) -> String {
        let selected: Vec<(&String, &String)> = if use_memory {
            self.task_outputs.iter().collect()
        } else {
            task.depends_on
                .iter()
                .filter_map(|dep| self.task_outputs.get_key_value(dep.name.as_str()))
                .collect()
        };

        selected
            .into_iter()
            .map(|(name, output)| format!("## Output of {}\n{}\n", name, output.trim()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for PipelineContext {
    fn default() -> Self {
        Self::new(PipelineInputs::new())
    }
}
