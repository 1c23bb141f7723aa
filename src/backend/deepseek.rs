//! DeepSeek chat completions client

use crate::backend::client::BackendConfig;
use crate::backend::response::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, GenerationError,
};
use crate::backend::TextGenerator;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

/// Models the DeepSeek API serves
pub const AVAILABLE_MODELS: [&str; 2] = ["deepseek-chat", "deepseek-reasoner"];

/// OpenAI-compatible client for the DeepSeek API
#[derive(Debug, Clone)]
pub struct DeepSeekClient {
    config: BackendConfig,
    client: Client,
}

impl DeepSeekClient {
    pub fn new(config: BackendConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GenerationError::Client(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn available_models() -> Vec<String> {
        AVAILABLE_MODELS.iter().map(|m| m.to_string()).collect()
    }
}

#[async_trait]
impl TextGenerator for DeepSeekClient {
    fn name(&self) -> &str {
        "deepseek"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str, stop: Option<&[String]>) -> Result<String, GenerationError> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            stop: stop.filter(|s| !s.is_empty()),
        };

        debug!(
            "DeepSeek request: model {}, prompt {} chars",
            self.config.model,
            prompt.len()
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("DeepSeek API error - Status: {}, Response: {}", status, body);
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        if let Some(usage) = &completion.usage {
            debug!(
                "DeepSeek response: {} tokens used (prompt: {}, completion: {})",
                usage.total_tokens, usage.prompt_tokens, usage.completion_tokens
            );
        }

        completion.into_content()
    }
}
