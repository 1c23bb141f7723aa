//! Run boundary - builds, executes and persists one pipeline run
//!
//! Every failure below this point is logged and turned into an error
//! report; [`PipelineRunner::run`] itself never fails.

use crate::core::{
    ConfigStore, Pipeline, PipelineError, PipelineInputs, PipelineRegistry, Preset, RunResults,
};
use crate::execution::ExecutionEngine;
use crate::persistence::ResultWriter;
use crate::variants::ExtendedPipeline;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Section of an inputs document that holds pipeline inputs
pub const INPUTS_SECTION: &str = "project_info";

/// Inputs document read by the extended preset when none is given
pub const EXTENDED_INPUTS_DOCUMENT: &str = "inputs_extended.yaml";

/// Preset matching a pipeline type's own documents
pub fn default_preset(pipeline_type: &str) -> Preset {
    if pipeline_type == ExtendedPipeline::TYPE {
        Preset::Extended
    } else {
        Preset::Standard
    }
}

/// Everything the command surface can choose for a run
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub pipeline_type: String,
    pub preset: Preset,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub verbose: bool,
    pub memory: Option<bool>,
    pub inputs_document: Option<String>,
    pub inputs: Vec<(String, String)>,
    pub save: bool,
}

impl RunRequest {
    pub fn new(pipeline_type: impl Into<String>) -> Self {
        let pipeline_type = pipeline_type.into();
        Self {
            preset: default_preset(&pipeline_type),
            pipeline_type,
            provider: None,
            model: None,
            verbose: true,
            memory: None,
            inputs_document: None,
            inputs: Vec::new(),
            save: true,
        }
    }

    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = preset;
        self
    }

    pub fn with_input(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.inputs.push((key.into(), value.into()));
        self
    }

    pub fn with_inputs_document(mut self, document: impl Into<String>) -> Self {
        self.inputs_document = Some(document.into());
        self
    }

    pub fn with_save(mut self, save: bool) -> Self {
        self.save = save;
        self
    }

    /// Inputs document for this run, falling back to the preset's own
    pub fn resolved_inputs_document(&self) -> Option<String> {
        self.inputs_document.clone().or_else(|| match self.preset {
            Preset::Extended => Some(EXTENDED_INPUTS_DOCUMENT.to_string()),
            Preset::Standard => None,
        })
    }
}

/// What a run left behind
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub success: bool,
    pub output_dir: Option<PathBuf>,
    pub results_file: Option<String>,
    pub error_report: Option<String>,
    pub error: Option<String>,
    pub completed_tasks: usize,
}

/// Drives a single run from request to artifacts
pub struct PipelineRunner {
    registry: PipelineRegistry,
    store: Arc<ConfigStore>,
    engine: Arc<dyn ExecutionEngine>,
    writer: ResultWriter,
}

impl PipelineRunner {
    pub fn new(
        registry: PipelineRegistry,
        store: Arc<ConfigStore>,
        engine: Arc<dyn ExecutionEngine>,
        writer: ResultWriter,
    ) -> Self {
        Self {
            registry,
            store,
            engine,
            writer,
        }
    }

    /// Run the pipeline; failures end up in an error report
    pub async fn run(&self, request: &RunRequest) -> RunReport {
        let mut report = RunReport::default();

        match self.try_run(request, &mut report).await {
            Ok(()) => {
                report.success = true;
                info!(
                    "Pipeline '{}' finished with {} tasks",
                    request.pipeline_type, report.completed_tasks
                );
            }
            Err(e) => {
                error!("Pipeline '{}' failed: {}", request.pipeline_type, e);
                let outcome = self.writer.write_error_report(
                    &e.to_string(),
                    report.output_dir.as_deref(),
                    &request.pipeline_type,
                );
                if outcome.success {
                    info!("Error report saved to {}", outcome.file_path);
                    report.error_report = Some(outcome.file_path);
                } else {
                    error!(
                        "Could not save error report: {}",
                        outcome.error_message.unwrap_or_default()
                    );
                }
                report.error = Some(e.to_string());
            }
        }

        report
    }

    async fn try_run(&self, request: &RunRequest, report: &mut RunReport) -> Result<(), PipelineError> {
        let pipeline = self.build(request)?;
        let inputs = self.collect_inputs(request);

        let outputs = pipeline.execute(self.engine.as_ref(), &inputs).await?;
        report.completed_tasks = outputs.len();

        if !request.save {
            info!("Result saving disabled");
            return Ok(());
        }

        let dir = self.writer.create_output_location()?;
        report.output_dir = Some(dir.clone());

        let outcome = self.writer.write_document(&RunResults::from(outputs), &dir);
        if !outcome.success {
            return Err(PipelineError::Persistence {
                path: outcome.file_path,
                source: std::io::Error::other(outcome.error_message.unwrap_or_default()),
            });
        }
        info!("Results saved to {}", outcome.file_path);
        report.results_file = Some(outcome.file_path);

        let mut info = pipeline.config_info();
        if let Some(document) = request.resolved_inputs_document() {
            info.insert("inputs_document".to_string(), document);
        }
        let snapshot = self.writer.write_config_snapshot(&info, &dir);
        if !snapshot.success {
            warn!(
                "Configuration snapshot not saved: {}",
                snapshot.error_message.unwrap_or_default()
            );
        }

        Ok(())
    }

    fn build(&self, request: &RunRequest) -> Result<Box<dyn Pipeline>, PipelineError> {
        let mut builder = request.preset.builder().with_verbose(request.verbose);
        if let Some(provider) = &request.provider {
            builder = builder.with_backend_provider(provider.clone());
        }
        if let Some(model) = &request.model {
            builder = builder.with_backend_model(model.clone());
        }
        if let Some(memory) = request.memory {
            builder = builder.with_memory(memory);
        }

        let config = builder.build();
        info!(
            "Creating '{}' pipeline from preset {} (backend {})",
            request.pipeline_type,
            request.preset,
            config.backend_provider()
        );
        self.registry.create(&request.pipeline_type, config)
    }

    /// Inputs document section first, then command-line overrides
    fn collect_inputs(&self, request: &RunRequest) -> PipelineInputs {
        let mut inputs = PipelineInputs::new();

        if let Some(document) = request.resolved_inputs_document() {
            match self.store.inputs(&document) {
                Ok(doc) => match doc.section_as_inputs(INPUTS_SECTION) {
                    Some(section) => inputs.extend(section),
                    None => warn!("Inputs document {} has no '{}' section", document, INPUTS_SECTION),
                },
                Err(e) => warn!("Inputs document {} not loaded: {}", document, e),
            }
        }

        for (key, value) in &request.inputs {
            inputs.insert(key.clone(), serde_json::Value::String(value.clone()));
        }
        inputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preset_follows_type() {
        assert_eq!(default_preset("extended"), Preset::Extended);
        assert_eq!(default_preset("standard"), Preset::Standard);
        assert_eq!(default_preset("custom"), Preset::Standard);
    }

    #[test]
    fn test_extended_preset_reads_its_inputs_document() {
        let request = RunRequest::new("extended");
        assert_eq!(
            request.resolved_inputs_document().as_deref(),
            Some(EXTENDED_INPUTS_DOCUMENT)
        );

        let request = RunRequest::new("standard");
        assert_eq!(request.resolved_inputs_document(), None);

        let request = RunRequest::new("standard").with_inputs_document("mine.yaml");
        assert_eq!(request.resolved_inputs_document().as_deref(), Some("mine.yaml"));
    }
}
