//! CLI output formatting

use crate::execution::{EventHandler, ExecutionEvent};
use crate::runner::RunReport;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");
pub static TOOL: Emoji<'_, '_> = Emoji("🔧 ", "* ");

/// Create a progress bar
pub fn create_progress_bar(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    if let Ok(bar_style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        progress.set_style(bar_style.progress_chars("#>-"));
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

/// Format an execution event for display
pub fn format_execution_event(event: &ExecutionEvent) -> String {
    match event {
        ExecutionEvent::RunStarted {
            run_id,
            pipeline,
            total_tasks,
        } => format!(
            "{} Starting pipeline {} with {} tasks ({})",
            ROCKET,
            style(pipeline).bold(),
            style(total_tasks).cyan(),
            style(&run_id.to_string()[..8]).dim()
        ),
        ExecutionEvent::TaskStarted { index, task, agent } => format!(
            "{} [{}] {} ({})",
            SPINNER,
            index + 1,
            style(task).cyan(),
            style(agent).dim()
        ),
        ExecutionEvent::ToolUsed { task, tool } => {
            format!("{} {} using {}", TOOL, style(task).dim(), style(tool).yellow())
        }
        ExecutionEvent::TaskCompleted {
            task, output_chars, ..
        } => format!(
            "{} {} ({} chars)",
            CHECK,
            style(task).green(),
            style(output_chars).dim()
        ),
        ExecutionEvent::TaskFailed { task, error } => {
            format!("{} {}: {}", CROSS, style(task).red(), style(error).dim())
        }
        ExecutionEvent::RunCompleted {
            run_id,
            completed_tasks,
        } => format!(
            "{} Pipeline ({}) completed {} tasks",
            INFO,
            style(&run_id.to_string()[..8]).dim(),
            style(completed_tasks).green()
        ),
    }
}

/// Event handler that drives a progress bar and prints each event above it
pub fn progress_handler() -> EventHandler {
    let bar: Arc<Mutex<Option<ProgressBar>>> = Arc::new(Mutex::new(None));

    Arc::new(move |event: ExecutionEvent| {
        let mut guard = match bar.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let line = format_execution_event(&event);

        match &event {
            ExecutionEvent::RunStarted { total_tasks, .. } => {
                println!("{}", line);
                *guard = Some(create_progress_bar(*total_tasks));
            }
            ExecutionEvent::TaskStarted { task, .. } => {
                if let Some(progress) = guard.as_ref() {
                    progress.println(line);
                    progress.set_message(task.clone());
                }
            }
            ExecutionEvent::TaskCompleted { .. } => {
                if let Some(progress) = guard.as_ref() {
                    progress.println(line);
                    progress.inc(1);
                }
            }
            ExecutionEvent::ToolUsed { .. } => {
                if let Some(progress) = guard.as_ref() {
                    progress.println(line);
                }
            }
            ExecutionEvent::TaskFailed { .. } | ExecutionEvent::RunCompleted { .. } => {
                if let Some(progress) = guard.take() {
                    progress.finish_and_clear();
                }
                println!("{}", line);
            }
        }
    })
}

/// Format the final run report
pub fn format_run_report(report: &RunReport) -> String {
    let mut lines = Vec::new();

    if report.success {
        lines.push(format!(
            "{} Pipeline completed {} ({} tasks)",
            CHECK,
            style("successfully").green(),
            report.completed_tasks
        ));
    } else {
        lines.push(format!(
            "{} Pipeline {}: {}",
            CROSS,
            style("failed").red(),
            report.error.as_deref().unwrap_or("unknown error")
        ));
    }

    if let Some(file) = &report.results_file {
        lines.push(format!("{} Results: {}", INFO, style(file).dim()));
    }
    if let Some(file) = &report.error_report {
        lines.push(format!("{} Error report: {}", WARN, style(file).dim()));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_failed_report() {
        console::set_colors_enabled(false);
        let report = RunReport {
            error: Some("boom".to_string()),
            error_report: Some("results/error_report.md".to_string()),
            ..RunReport::default()
        };

        let text = format_run_report(&report);
        assert!(text.contains("failed: boom"));
        assert!(text.contains("Error report: results/error_report.md"));
        assert!(!text.contains("Results:"));
    }

    #[test]
    fn test_format_task_event() {
        console::set_colors_enabled(false);
        let text = format_execution_event(&ExecutionEvent::TaskStarted {
            index: 0,
            task: "research_task".to_string(),
            agent: "Lead Market Analyst".to_string(),
        });
        assert!(text.contains("[1] research_task (Lead Market Analyst)"));
    }
}
