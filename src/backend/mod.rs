//! Text generation backends
//!
//! Agents consult a backend through the narrow [`TextGenerator`] contract.
//! [`BackendResolver`] turns a `(provider, model)` pair from a pipeline
//! configuration into a ready client, failing early when the provider is
//! unknown or its credential is missing.

pub mod client;
pub mod deepseek;
pub mod response;

use crate::core::error::PipelineError;
use async_trait::async_trait;
pub use client::{BackendConfig, DEEPSEEK_BASE_URL, DEFAULT_MODEL};
pub use deepseek::DeepSeekClient;
pub use response::{GenerationError, TokenUsage};
use std::sync::Arc;
use tracing::debug;

/// Environment variable holding the DeepSeek API key
pub const DEEPSEEK_API_KEY_VAR: &str = "DEEPSEEK_API_KEY";

/// Environment variable overriding the DeepSeek endpoint
pub const DEEPSEEK_BASE_URL_VAR: &str = "DEEPSEEK_BASE_URL";

/// Trait for text generation - allows for different implementations
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Model identifier
    fn model(&self) -> &str;

    /// Generate text for a prompt, stopping at any of the given sequences
    async fn generate(&self, prompt: &str, stop: Option<&[String]>) -> Result<String, GenerationError>;
}

/// Where API keys are read from
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// Process environment, read at resolution time
    Environment,
    /// Fixed value; `None` behaves like an unset variable
    Static(Option<String>),
}

impl CredentialSource {
    fn lookup(&self, variable: &str) -> Option<String> {
        let value = match self {
            CredentialSource::Environment => std::env::var(variable).ok(),
            CredentialSource::Static(value) => value.clone(),
        };
        value.filter(|v| !v.trim().is_empty())
    }
}

/// Resolves a provider/model pair into a generation client
#[derive(Debug, Clone)]
pub struct BackendResolver {
    credentials: CredentialSource,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl BackendResolver {
    pub fn new(credentials: CredentialSource) -> Self {
        Self {
            credentials,
            base_url: None,
            timeout_secs: None,
        }
    }

    /// Read the API key and optional endpoint override from the environment
    pub fn from_env() -> Self {
        let mut resolver = Self::new(CredentialSource::Environment);
        resolver.base_url = std::env::var(DEEPSEEK_BASE_URL_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty());
        resolver
    }

    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self::new(CredentialSource::Static(Some(api_key.into())))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Providers this resolver recognizes
    pub fn supported_providers() -> Vec<&'static str> {
        vec!["deepseek"]
    }

    /// Build a client for the provider; matching is case-insensitive
    pub fn resolve(
        &self,
        provider: &str,
        model: Option<&str>,
    ) -> Result<Arc<dyn TextGenerator>, PipelineError> {
        match provider.to_lowercase().as_str() {
            "deepseek" => {
                let api_key = self
                    .credentials
                    .lookup(DEEPSEEK_API_KEY_VAR)
                    .ok_or_else(|| PipelineError::MissingCredential(DEEPSEEK_API_KEY_VAR.to_string()))?;

                let mut config = BackendConfig::new(api_key);
                if let Some(model) = model {
                    config = config.with_model(model);
                }
                if let Some(base_url) = &self.base_url {
                    config = config.with_base_url(base_url.clone());
                }
                if let Some(timeout) = self.timeout_secs {
                    config = config.with_timeout(timeout);
                }

                debug!("Resolved backend deepseek ({}) at {}", config.model, config.base_url);
                Ok(Arc::new(DeepSeekClient::new(config)?))
            }
            _ => Err(PipelineError::UnsupportedBackend(provider.to_string())),
        }
    }
}

impl Default for BackendResolver {
    fn default() -> Self {
        Self::from_env()
    }
}
