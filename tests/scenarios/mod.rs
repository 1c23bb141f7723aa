//! Scenario-based tests for crewline runs

mod end_to_end;
mod extended_inputs;
mod failure_report;
mod successful_run;

use crate::helpers::*;
use crewline::core::PipelineRegistry;
use crewline::execution::ExecutionEngine;
use crewline::persistence::ResultWriter;
use crewline::runner::PipelineRunner;
use std::path::Path;
use std::sync::Arc;

/// Runner over the shipped documents in `config_dir`
pub fn runner(config_dir: &Path, results_dir: &Path, engine: Arc<dyn ExecutionEngine>) -> PipelineRunner {
    write_shipped_documents(config_dir);
    let (store, env) = environment(config_dir);
    PipelineRunner::new(
        PipelineRegistry::with_builtin_pipelines(env),
        store,
        engine,
        ResultWriter::new(results_dir),
    )
}
