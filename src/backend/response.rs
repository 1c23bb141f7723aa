//! Backend error and wire types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for text generation
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Transport failure (connect, timeout, body read)
    #[error("request to backend failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status
    #[error("backend API error: {status} - {body}")]
    Api { status: u16, body: String },

    /// The backend answered but not with the expected shape
    #[error("unexpected backend response: {0}")]
    InvalidResponse(String),

    /// The HTTP client could not be built
    #[error("backend client error: {0}")]
    Client(String),
}

/// Token usage information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<&'a [String]>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of `choices[0].message.content`
    pub fn into_content(self) -> Result<String, GenerationError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| {
                GenerationError::InvalidResponse("missing choices[0].message.content".to_string())
            })
    }
}
