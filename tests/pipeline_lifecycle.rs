//! Registry, construction and catalog tests over the shipped documents

mod helpers;

use crewline::backend::{BackendResolver, CredentialSource};
use crewline::core::{PipelineError, PipelineGraph, PipelineRegistry, Preset};
use crewline::runner::default_preset;
use helpers::*;

fn assemble(registry: &PipelineRegistry, pipeline_type: &str) -> PipelineGraph {
    let config = default_preset(pipeline_type).builder().build();
    let pipeline = match registry.create(pipeline_type, config) {
        Ok(pipeline) => pipeline,
        Err(e) => panic!("could not create {}: {}", pipeline_type, e),
    };
    pipeline.assemble().unwrap()
}

/// Every dependency sits strictly earlier in the task sequence
fn assert_dependencies_precede(graph: &PipelineGraph) {
    let names = graph.task_names();
    for (index, task) in graph.tasks.iter().enumerate() {
        for dependency in task.dependency_names() {
            let position = names
                .iter()
                .position(|n| *n == dependency)
                .unwrap_or_else(|| panic!("{} depends on unknown {}", task.name, dependency));
            assert!(
                position < index,
                "{} depends on {} declared later",
                task.name,
                dependency
            );
        }
    }
}

#[test]
fn test_builtin_types_in_registration_order() {
    let dir = tempfile::tempdir().unwrap();
    let (_, registry) = builtin_registry(dir.path());

    assert_eq!(registry.available_types(), vec!["standard", "extended"]);
    assert!(registry.contains("extended"));
    assert!(!registry.contains("gaming"));
}

#[test]
fn test_standard_catalog_from_shipped_documents() {
    let dir = tempfile::tempdir().unwrap();
    write_shipped_documents(dir.path());
    let (store, registry) = builtin_registry(dir.path());

    let graph = assemble(&registry, "standard");

    assert_eq!(graph.label, "standard");
    assert_eq!(graph.agents.len(), 3);
    assert_eq!(graph.tasks.len(), 5);
    assert_eq!(graph.agents[0].role, "Lead Market Analyst");
    assert!(graph.tasks[0]
        .description
        .contains("{{ project_description }}"));
    assert_dependencies_precede(&graph);

    let cached = store.cache_info().cached;
    assert_eq!(cached, vec!["agents:agents.yaml", "tasks:tasks.yaml"]);
}

#[test]
fn test_extended_catalog_from_shipped_documents() {
    let dir = tempfile::tempdir().unwrap();
    write_shipped_documents(dir.path());
    let (_, registry) = builtin_registry(dir.path());

    let graph = assemble(&registry, "extended");

    assert_eq!(graph.agents.len(), 6);
    assert_eq!(graph.tasks.len(), 8);
    assert_eq!(graph.tasks[7].name, "campaign_execution_task");
    assert_eq!(graph.tasks[7].depends_on.len(), 3);
    assert_dependencies_precede(&graph);
}

#[test]
fn test_unknown_type_lists_available_types() {
    let dir = tempfile::tempdir().unwrap();
    let (_, registry) = builtin_registry(dir.path());

    let err = registry
        .create("gaming", Preset::Standard.builder().build())
        .err()
        .unwrap();

    match &err {
        PipelineError::UnknownPipelineType { requested, available } => {
            assert_eq!(requested, "gaming");
            assert_eq!(available, &vec!["standard".to_string(), "extended".to_string()]);
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(err.to_string().contains("available: standard, extended"));
}

#[test]
fn test_construction_errors_propagate() {
    let dir = tempfile::tempdir().unwrap();
    write_shipped_documents(dir.path());
    let (_, registry) = builtin_registry(dir.path());

    let unsupported = registry
        .create(
            "standard",
            Preset::Standard.builder().with_backend_provider("openai").build(),
        )
        .err()
        .unwrap();
    assert!(matches!(unsupported, PipelineError::UnsupportedBackend(ref p) if p == "openai"));

    let empty = tempfile::tempdir().unwrap();
    let (_, registry) = builtin_registry(empty.path());
    let missing = registry
        .create("standard", Preset::Standard.builder().build())
        .err()
        .unwrap();
    assert!(matches!(missing, PipelineError::ConfigNotFound { .. }));
}

#[test]
fn test_missing_credential_fails_at_construction() {
    let dir = tempfile::tempdir().unwrap();
    write_shipped_documents(dir.path());
    let (_, env) = environment_with(
        dir.path(),
        BackendResolver::new(CredentialSource::Static(None)),
    );
    let registry = PipelineRegistry::with_builtin_pipelines(env);

    let err = registry
        .create("standard", Preset::Standard.builder().build())
        .err()
        .unwrap();

    assert!(matches!(err, PipelineError::MissingCredential(ref var) if var == "DEEPSEEK_API_KEY"));
    assert!(!registry.validate("standard", Preset::Standard.builder().build()));
}

#[test]
fn test_validate_collapses_errors() {
    let dir = tempfile::tempdir().unwrap();
    write_shipped_documents(dir.path());
    let (_, registry) = builtin_registry(dir.path());

    assert!(registry.validate("standard", Preset::Standard.builder().build()));
    assert!(registry.validate("extended", Preset::Extended.builder().build()));
    assert!(!registry.validate("gaming", Preset::Standard.builder().build()));
    assert!(!registry.validate(
        "standard",
        Preset::Standard
            .builder()
            .with_agents_document("missing.yaml")
            .build()
    ));
}

#[test]
fn test_config_info_is_ordered() {
    let dir = tempfile::tempdir().unwrap();
    write_shipped_documents(dir.path());
    let (_, registry) = builtin_registry(dir.path());

    let pipeline = registry
        .create(
            "extended",
            Preset::Extended
                .builder()
                .with_backend_model("deepseek-chat")
                .with_memory(true)
                .build(),
        )
        .ok()
        .unwrap();
    let info = pipeline.config_info();

    let keys: Vec<&str> = info.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "pipeline_type",
            "backend_provider",
            "backend_model",
            "agents_document",
            "tasks_document",
            "verbose",
            "memory"
        ]
    );
    assert_eq!(info["backend_model"], "deepseek-chat");
    assert_eq!(info["agents_document"], "agents_extended.yaml");
    assert_eq!(info["memory"], "true");
}
