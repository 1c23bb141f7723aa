//! Backend client configuration

use std::time::Duration;

/// Default DeepSeek API endpoint
pub const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com/v1";

/// Model used when the configuration names none
pub const DEFAULT_MODEL: &str = "deepseek-reasoner";

/// Configuration for a generation client
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Bearer token
    pub api_key: String,

    /// API base URL, without the `/chat/completions` suffix
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Completion length limit
    pub max_tokens: u32,

    /// Timeout for requests in seconds
    pub timeout_secs: u64,
}

impl BackendConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEEPSEEK_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 1.0,
            max_tokens: 1000,
            timeout_secs: 30,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
