//! CLI command definitions

use crate::core::Preset;
use crate::runner::{default_preset, RunRequest};
use clap::Args;

/// Run a pipeline
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Registered pipeline type
    #[arg(default_value = "standard")]
    pub pipeline_type: String,

    /// Preset configuration the overrides apply to (follows the type when omitted)
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Backend provider
    #[arg(long)]
    pub provider: Option<String>,

    /// Backend model
    #[arg(long)]
    pub model: Option<String>,

    /// Pass every earlier task output to each task
    #[arg(long)]
    pub memory: bool,

    /// Hide the per-task progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Inputs document (its project_info section becomes pipeline inputs)
    #[arg(long)]
    pub inputs: Option<String>,

    /// Input overrides (key=value)
    #[arg(long, value_parser = parse_key_value)]
    pub input: Vec<(String, String)>,

    /// Don't write results to disk
    #[arg(long)]
    pub no_save: bool,
}

impl RunCommand {
    pub fn to_request(&self) -> RunRequest {
        RunRequest {
            pipeline_type: self.pipeline_type.clone(),
            preset: self
                .preset
                .unwrap_or_else(|| default_preset(&self.pipeline_type)),
            provider: self.provider.clone(),
            model: self.model.clone(),
            verbose: !self.quiet,
            memory: self.memory.then_some(true),
            inputs_document: self.inputs.clone(),
            inputs: self.input.clone(),
            save: !self.no_save,
        }
    }
}

/// Check pipeline types
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Pipeline type to check (all registered types when omitted)
    pub pipeline_type: Option<String>,

    /// Preset configuration to check with (follows the type when omitted)
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,
}

/// List registered pipeline types
#[derive(Debug, Args, Clone)]
pub struct ListCommand {
    /// Show each type's task graph
    #[arg(long)]
    pub tasks: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Parse key=value pairs
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("Invalid key=value pair: {}", s)),
    }
}
