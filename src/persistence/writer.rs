//! Result writer - lays out run output as markdown documents

use crate::core::{PipelineError, RunResults};
use crate::persistence::normalizer::{clean, resolve};
use crate::persistence::SaveOutcome;
use chrono::{DateTime, Local};
use indexmap::IndexMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DIRECTORY_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
const FILE_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Recovery steps listed in every error report
pub const RECOMMENDATIONS: [&str; 3] = [
    "Check the log output above",
    "Try running the pipeline again",
    "Contact the pipeline maintainer",
];

/// Writes results below a base directory, one timestamped directory per run
#[derive(Debug, Clone)]
pub struct ResultWriter {
    base_dir: PathBuf,
}

impl ResultWriter {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Create `results_<date>_<time>` for the current second
    pub fn create_output_location(&self) -> Result<PathBuf, PipelineError> {
        self.create_output_location_at(Local::now())
    }

    /// Create the directory for a given instant; an existing one is reused
    pub fn create_output_location_at(&self, at: DateTime<Local>) -> Result<PathBuf, PipelineError> {
        let dir = self
            .base_dir
            .join(format!("results_{}", at.format(DIRECTORY_FORMAT)));
        fs::create_dir_all(&dir).map_err(|source| PipelineError::Persistence {
            path: dir.display().to_string(),
            source,
        })?;
        debug!("Output location: {}", dir.display());
        Ok(dir)
    }

    /// Write the results document
    pub fn write_document(&self, results: &RunResults, dir: &Path) -> SaveOutcome {
        let now = Local::now();
        let path = dir.join(format!("results_{}.md", now.format(FILE_FORMAT)));
        let content = Self::render_document(results, now);
        Self::write_file(&path, &content)
    }

    /// Write `config_info.md` with one bold key per line
    pub fn write_config_snapshot(&self, info: &IndexMap<String, String>, dir: &Path) -> SaveOutcome {
        let path = dir.join("config_info.md");
        let mut content = String::from("# Configuration\n\n");
        let _ = write!(content, "**Run date:** {}\n\n", Local::now().format(DISPLAY_FORMAT));
        for (key, value) in info {
            let _ = writeln!(content, "**{}:** {}", key, value);
        }
        Self::write_file(&path, &content)
    }

    /// Write an error report, creating a fresh output location if none is given
    pub fn write_error_report(&self, message: &str, dir: Option<&Path>, pipeline_label: &str) -> SaveOutcome {
        let dir = match dir {
            Some(dir) => dir.to_path_buf(),
            None => match self.create_output_location() {
                Ok(dir) => dir,
                Err(e) => return SaveOutcome::failed(&self.base_dir, e),
            },
        };

        let now = Local::now();
        let path = dir.join(format!("error_report_{}.md", now.format(FILE_FORMAT)));

        let mut content = String::from("# Pipeline Error Report\n\n");
        let _ = writeln!(content, "**Date:** {}", now.format(DISPLAY_FORMAT));
        let _ = writeln!(content, "**Error:** {}", message);
        let _ = write!(content, "**Pipeline:** {}\n\n", pipeline_label);
        content.push_str("## Recommendations\n");
        for (i, recommendation) in RECOMMENDATIONS.iter().enumerate() {
            let _ = writeln!(content, "{}. {}", i + 1, recommendation);
        }

        Self::write_file(&path, &content)
    }

    /// Render the results document (pure function)
    pub fn render_document(results: &RunResults, at: DateTime<Local>) -> String {
        let mut content = String::from("# Pipeline Results\n\n");
        let _ = write!(content, "**Created:** {}\n\n", at.format(DISPLAY_FORMAT));
        content.push_str("## Task Results\n\n");

        match results {
            RunResults::Tasks(outputs) => {
                for (i, output) in outputs.iter().enumerate() {
                    let resolved = resolve(output);
                    let _ = write!(content, "### Task {}\n\n", i + 1);
                    let _ = write!(
                        content,
                        "**Agent:** {}\n\n",
                        resolved.agent_name.as_deref().unwrap_or("unknown")
                    );
                    let _ = write!(
                        content,
                        "**Task:** {}\n\n",
                        resolved.task_name.as_deref().unwrap_or("unknown")
                    );
                    content.push_str("**Result:**\n\n");
                    let _ = write!(content, "{}\n\n", clean(&resolved.body));
                    content.push_str("---\n\n");
                }
            }
            RunResults::Overall(text) => {
                content.push_str("### Overall Result\n\n");
                let _ = write!(content, "{}\n\n", clean(text));
            }
        }

        content
    }

    fn write_file(path: &Path, content: &str) -> SaveOutcome {
        match fs::write(path, content) {
            Ok(()) => {
                debug!("Wrote {} ({} bytes)", path.display(), content.len());
                SaveOutcome::saved(path)
            }
            Err(source) => {
                let err = PipelineError::Persistence {
                    path: path.display().to_string(),
                    source,
                };
                warn!("{}", err);
                SaveOutcome::failed(path, err)
            }
        }
    }
}
