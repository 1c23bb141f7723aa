//! Error taxonomy for configuration, construction and persistence

use crate::backend::GenerationError;
use thiserror::Error;

/// Errors raised by the orchestration layer
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A configuration document does not exist at the resolved path
    #[error("configuration document not found: {path}")]
    ConfigNotFound { path: String },

    /// A configuration document exists but is not valid YAML
    #[error("invalid YAML in {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// A configuration document has the wrong structure
    #[error("invalid configuration document {document}: {reason}")]
    ConfigValidation {
        document: String,
        entry: Option<String>,
        field: Option<String>,
        reason: String,
    },

    /// No constructor is registered for the requested pipeline type
    #[error("unknown pipeline type '{requested}' (available: {})", .available.join(", "))]
    UnknownPipelineType {
        requested: String,
        available: Vec<String>,
    },

    /// The backend provider is not one this crate can talk to
    #[error("unsupported backend provider '{0}'")]
    UnsupportedBackend(String),

    /// The credential for the resolved backend is not available
    #[error("missing credential: environment variable {0} is not set")]
    MissingCredential(String),

    /// The backend client could not be built
    #[error("backend initialization failed: {0}")]
    Backend(#[from] GenerationError),

    /// A pipeline variant rejected its configuration
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfiguration(String),

    /// A task references a dependency that is not declared before it
    #[error("task '{task}' depends on '{dependency}', which is not declared earlier in the task sequence")]
    DependencyOrder { task: String, dependency: String },

    /// An abstract pipeline operation was not provided by the variant
    #[error("{0} is not implemented by this pipeline")]
    NotImplemented(&'static str),

    /// The execution engine failed while running the graph
    #[error("execution engine failed: {0:#}")]
    EngineExecution(#[source] anyhow::Error),

    /// Writing an output document failed
    #[error("failed to write {path}: {source}")]
    Persistence {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Build a validation error for a whole document
    pub fn invalid_document(document: &str, reason: impl Into<String>) -> Self {
        PipelineError::ConfigValidation {
            document: document.to_string(),
            entry: None,
            field: None,
            reason: reason.into(),
        }
    }

    /// Build a validation error for a single entry, optionally naming a field
    pub fn invalid_entry(
        document: &str,
        entry: &str,
        field: Option<&str>,
        reason: impl Into<String>,
    ) -> Self {
        PipelineError::ConfigValidation {
            document: document.to_string(),
            entry: Some(entry.to_string()),
            field: field.map(str::to_string),
            reason: reason.into(),
        }
    }
}
