use anyhow::{Context, Result};
use crewline::backend::{BackendResolver, DeepSeekClient};
use crewline::cli::commands::{ListCommand, RunCommand, ValidateCommand};
use crewline::cli::output::*;
use crewline::cli::{Cli, Command};
use crewline::core::{ConfigStore, PipelineEnvironment, PipelineRegistry};
use crewline::execution::SequentialEngine;
use crewline::persistence::ResultWriter;
use crewline::runner::{default_preset, PipelineRunner};
use crewline::tools::ToolBox;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("Failed to set logging subscriber")?;

    let store = Arc::new(ConfigStore::from_dir(&cli.config_dir));
    let env = Arc::new(PipelineEnvironment::new(
        Arc::clone(&store),
        BackendResolver::from_env(),
    ));
    let registry = PipelineRegistry::with_builtin_pipelines(env);

    match &cli.command {
        Command::Run(cmd) => run_pipeline(cmd, &cli, registry, store).await,
        Command::Validate(cmd) => validate_pipelines(cmd, &registry),
        Command::List(cmd) => list_pipelines(cmd, &registry),
    }
}

async fn run_pipeline(
    cmd: &RunCommand,
    cli: &Cli,
    registry: PipelineRegistry,
    store: Arc<ConfigStore>,
) -> Result<()> {
    let mut engine = SequentialEngine::new(ToolBox::from_env());
    if !cmd.quiet {
        let handler = progress_handler();
        engine = engine.with_event_handler(move |event| handler(event));
    }

    let runner = PipelineRunner::new(
        registry,
        store,
        Arc::new(engine),
        ResultWriter::new(&cli.results_dir),
    );

    let request = cmd.to_request();
    println!(
        "{} Running {} pipeline (preset {})",
        INFO,
        style(&request.pipeline_type).bold(),
        style(request.preset).cyan()
    );

    let report = runner.run(&request).await;
    println!("\n{}", format_run_report(&report));

    // Failures are recorded in the error report; the exit code stays 0
    Ok(())
}

fn validate_pipelines(cmd: &ValidateCommand, registry: &PipelineRegistry) -> Result<()> {
    let types = match &cmd.pipeline_type {
        Some(pipeline_type) => vec![pipeline_type.clone()],
        None => registry.available_types(),
    };

    println!("{} Validating {} pipeline type(s)...", INFO, types.len());

    let mut failed = 0;
    for pipeline_type in &types {
        let preset = cmd.preset.unwrap_or_else(|| default_preset(pipeline_type));
        if registry.validate(pipeline_type, preset.builder().build()) {
            println!("  {} {}", CHECK, style(pipeline_type).bold());
        } else {
            failed += 1;
            println!("  {} {} (see log for details)", CROSS, style(pipeline_type).red());
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn list_pipelines(cmd: &ListCommand, registry: &PipelineRegistry) -> Result<()> {
    let types = registry.available_types();

    if cmd.json {
        let mut entries = Vec::new();
        for pipeline_type in &types {
            let tasks = if cmd.tasks {
                task_graph(registry, pipeline_type).ok()
            } else {
                None
            };
            entries.push(serde_json::json!({
                "type": pipeline_type,
                "tasks": tasks,
            }));
        }
        let data = serde_json::json!({
            "pipelines": entries,
            "providers": BackendResolver::supported_providers(),
            "models": DeepSeekClient::available_models(),
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    println!("{} Registered pipeline types:", INFO);
    for pipeline_type in &types {
        println!("  {}", style(pipeline_type).bold());
        if !cmd.tasks {
            continue;
        }
        match task_graph(registry, pipeline_type) {
            Ok(tasks) => {
                for (i, (task, deps)) in tasks.iter().enumerate() {
                    if deps.is_empty() {
                        println!("    {}. {}", i + 1, style(task).cyan());
                    } else {
                        println!(
                            "    {}. {} ← {}",
                            i + 1,
                            style(task).cyan(),
                            style(deps.join(", ")).dim()
                        );
                    }
                }
            }
            Err(e) => println!("    {} {}", WARN, style(e).dim()),
        }
    }

    println!(
        "\n{} Backend providers: {}",
        INFO,
        BackendResolver::supported_providers().join(", ")
    );
    println!("{} Known models: {}", INFO, DeepSeekClient::available_models().join(", "));
    Ok(())
}

/// Task names with their dependencies, in declared order
fn task_graph(registry: &PipelineRegistry, pipeline_type: &str) -> Result<Vec<(String, Vec<String>)>> {
    let config = default_preset(pipeline_type).builder().build();
    let pipeline = registry.create(pipeline_type, config)?;
    let graph = pipeline.assemble()?;
    Ok(graph
        .tasks
        .iter()
        .map(|task| {
            (
                task.name.clone(),
                task.dependency_names().into_iter().map(String::from).collect(),
            )
        })
        .collect())
}
