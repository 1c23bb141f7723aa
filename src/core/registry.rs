//! Registry mapping pipeline type identifiers to constructors

use crate::core::error::PipelineError;
use crate::core::pipeline::{construct, Pipeline, PipelineEnvironment, PipelineVariant};
use crate::core::pipeline_config::PipelineConfiguration;
use crate::variants::{ExtendedPipeline, StandardPipeline};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Builds a pipeline from a configuration
pub type PipelineConstructor =
    Box<dyn Fn(PipelineConfiguration) -> Result<Box<dyn Pipeline>, PipelineError> + Send + Sync>;

/// Named pipeline constructors, kept in registration order
#[derive(Default)]
pub struct PipelineRegistry {
    constructors: IndexMap<String, PipelineConstructor>,
}

impl PipelineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the `standard` and `extended` pipelines
    pub fn with_builtin_pipelines(env: Arc<PipelineEnvironment>) -> Self {
        let mut registry = Self::new();
        registry.register_variant::<StandardPipeline>(StandardPipeline::TYPE, Arc::clone(&env));
        registry.register_variant::<ExtendedPipeline>(ExtendedPipeline::TYPE, env);
        registry
    }

    /// Store or replace the constructor for a type
    pub fn register<F>(&mut self, pipeline_type: impl Into<String>, constructor: F)
    where
        F: Fn(PipelineConfiguration) -> Result<Box<dyn Pipeline>, PipelineError> + Send + Sync + 'static,
    {
        let pipeline_type = pipeline_type.into();
        debug!("Registering pipeline type '{}'", pipeline_type);
        self.constructors.insert(pipeline_type, Box::new(constructor));
    }

    /// Register a variant built through [`construct`]
    pub fn register_variant<V: PipelineVariant>(
        &mut self,
        pipeline_type: impl Into<String>,
        env: Arc<PipelineEnvironment>,
    ) {
        self.register(pipeline_type, move |config| {
            let pipeline: V = construct(config, &env)?;
            Ok(Box::new(pipeline) as Box<dyn Pipeline>)
        });
    }

    /// Build a pipeline of the given type
    ///
    /// Constructor failures are returned unchanged.
    pub fn create(
        &self,
        pipeline_type: &str,
        config: PipelineConfiguration,
    ) -> Result<Box<dyn Pipeline>, PipelineError> {
        let constructor = self.constructors.get(pipeline_type).ok_or_else(|| {
            PipelineError::UnknownPipelineType {
                requested: pipeline_type.to_string(),
                available: self.available_types(),
            }
        })?;
        constructor(config)
    }

    /// Probe whether a pipeline of this type can be built and assembled
    ///
    /// This performs a full construction: the backend is resolved and the
    /// configuration documents are loaded into the store's cache. Any
    /// failure, including an unknown type, yields `false`.
    pub fn validate(&self, pipeline_type: &str, config: PipelineConfiguration) -> bool {
        match self
            .create(pipeline_type, config)
            .and_then(|pipeline| pipeline.assemble().map(|_| ()))
        {
            Ok(()) => true,
            Err(e) => {
                warn!("Pipeline type '{}' failed validation: {}", pipeline_type, e);
                false
            }
        }
    }

    /// Registered type identifiers, in registration order
    pub fn available_types(&self) -> Vec<String> {
        self.constructors.keys().cloned().collect()
    }

    pub fn contains(&self, pipeline_type: &str) -> bool {
        self.constructors.contains_key(pipeline_type)
    }
}

impl fmt::Debug for PipelineRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineRegistry")
            .field("types", &self.available_types())
            .finish()
    }
}
